//! Light palette

use ratatui::style::Color;

use crate::theme::Theme;

pub fn light() -> Theme {
    Theme {
        bg0: Color::Rgb(0xfa, 0xfa, 0xfa),
        bg1: Color::Rgb(0xf0, 0xf0, 0xf0),
        bg2: Color::Rgb(0xd9, 0xd9, 0xd9),
        fg0: Color::Rgb(0x38, 0x3a, 0x42),
        fg1: Color::Rgb(0x20, 0x20, 0x20),
        grey0: Color::Rgb(0xa0, 0xa1, 0xa7),
        grey1: Color::Rgb(0x69, 0x6c, 0x77),
        accent: Color::Rgb(0x01, 0x84, 0xbc),
        selection: Color::Rgb(0xd9, 0xd9, 0xd9),
        heading: Color::Rgb(0x40, 0x78, 0xf2),
        link: Color::Rgb(0x01, 0x84, 0xbc),
        quote: Color::Rgb(0x50, 0xa1, 0x4f),
        error: Color::Rgb(0xe4, 0x56, 0x49),
        success: Color::Rgb(0x50, 0xa1, 0x4f),
        info: Color::Rgb(0x40, 0x78, 0xf2),
        code_fg: Color::Rgb(0x38, 0x3a, 0x42),
        code_bg: Color::Rgb(0xea, 0xea, 0xeb),
        code_keyword: Color::Rgb(0xa6, 0x26, 0xa4),
        code_string: Color::Rgb(0x50, 0xa1, 0x4f),
        code_comment: Color::Rgb(0xa0, 0xa1, 0xa7),
        code_number: Color::Rgb(0x98, 0x64, 0x01),
    }
}
