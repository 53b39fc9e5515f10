//! Dark palette, loosely One Dark with Dracula-flavored code colors

use ratatui::style::Color;

use crate::theme::Theme;

pub fn dark() -> Theme {
    Theme {
        bg0: Color::Rgb(0x20, 0x20, 0x20), // page background
        bg1: Color::Rgb(0x28, 0x2c, 0x34),
        bg2: Color::Rgb(0x3e, 0x44, 0x51),
        fg0: Color::Rgb(0xab, 0xb2, 0xbf),
        fg1: Color::Rgb(0xd7, 0xda, 0xe0),
        grey0: Color::Rgb(0x5c, 0x63, 0x70),
        grey1: Color::Rgb(0x7f, 0x84, 0x8e),
        accent: Color::Rgb(0x56, 0xb6, 0xc2),
        selection: Color::Rgb(0x3e, 0x44, 0x51),
        heading: Color::Rgb(0x61, 0xaf, 0xef),
        link: Color::Rgb(0x56, 0xb6, 0xc2),
        quote: Color::Rgb(0x98, 0xc3, 0x79),
        error: Color::Rgb(0xe0, 0x6c, 0x75),
        success: Color::Rgb(0x98, 0xc3, 0x79),
        info: Color::Rgb(0x61, 0xaf, 0xef),
        code_fg: Color::Rgb(0xf8, 0xf8, 0xf2), // dracula fg
        code_bg: Color::Rgb(0x28, 0x2a, 0x36), // dracula bg
        code_keyword: Color::Rgb(0xff, 0x79, 0xc6),
        code_string: Color::Rgb(0xf1, 0xfa, 0x8c),
        code_comment: Color::Rgb(0x62, 0x72, 0xa4),
        code_number: Color::Rgb(0xbd, 0x93, 0xf9),
    }
}
