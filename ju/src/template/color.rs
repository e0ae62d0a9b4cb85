//! ANSI escape codes for the `color` helper
//!
//! Styles look like `fg+attrs:bg+attrs`, e.g. `red+b`, `white:blue`,
//! `yellow+bh:black` or `214`. Attributes: `b` bold, `d` dim, `i` inverse,
//! `u` underline, `B` blink, `s` strikethrough, `h` high intensity.

use colored::Color;
use tracing::debug;

const RESET: &str = "\x1b[0m";

/// Escape sequence for a style string, empty when nothing in it is recognised
pub fn color_code(style: &str) -> String {
    debug!(%style, "color_code: called");
    let style = style.trim();
    if style.is_empty() {
        return String::new();
    }
    if style == "reset" {
        return RESET.to_string();
    }

    let (fg, bg) = style.split_once(':').unwrap_or((style, ""));
    let mut codes = Vec::new();
    push_part(&mut codes, fg, Layer::Foreground);
    push_part(&mut codes, bg, Layer::Background);

    if codes.is_empty() {
        debug!(%style, "color_code: no recognised codes");
        return String::new();
    }
    format!("\x1b[{}m", codes.join(";"))
}

#[derive(Clone, Copy)]
enum Layer {
    Foreground,
    Background,
}

fn push_part(codes: &mut Vec<String>, part: &str, layer: Layer) {
    let (name, attrs) = part.split_once('+').unwrap_or((part, ""));
    let bright = attrs.contains('h');

    if let Layer::Foreground = layer {
        for attr in attrs.chars() {
            let code = match attr {
                'b' => "1",
                'd' => "2",
                'i' => "7",
                'u' => "4",
                'B' => "5",
                's' => "9",
                _ => continue,
            };
            codes.push(code.to_string());
        }
    }

    if let Some(code) = color_for(name, bright, layer) {
        codes.push(code);
    }
}

fn color_for(name: &str, bright: bool, layer: Layer) -> Option<String> {
    if name.is_empty() || name == "default" {
        return None;
    }

    if let Ok(index) = name.parse::<u8>() {
        return Some(match layer {
            Layer::Foreground => format!("38;5;{}", index),
            Layer::Background => format!("48;5;{}", index),
        });
    }

    let lookup = if bright {
        format!("bright {}", name)
    } else {
        name.to_string()
    };
    let color: Color = lookup.parse().ok()?;
    Some(match layer {
        Layer::Foreground => color.to_fg_str().to_string(),
        Layer::Background => color.to_bg_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_foreground() {
        assert_eq!(color_code("red"), "\x1b[31m");
        assert_eq!(color_code("blue"), "\x1b[34m");
    }

    #[test]
    fn test_attributes_and_background() {
        assert_eq!(color_code("red+b"), "\x1b[1;31m");
        assert_eq!(color_code("white:blue"), "\x1b[37;44m");
        assert_eq!(color_code("green+bu:black"), "\x1b[1;4;32;40m");
    }

    #[test]
    fn test_high_intensity() {
        assert_eq!(color_code("red+h"), "\x1b[91m");
    }

    #[test]
    fn test_indexed_colors() {
        assert_eq!(color_code("214"), "\x1b[38;5;214m");
        assert_eq!(color_code("default:22"), "\x1b[48;5;22m");
    }

    #[test]
    fn test_reset_and_unknown() {
        assert_eq!(color_code("reset"), RESET);
        assert_eq!(color_code(""), "");
        assert_eq!(color_code("chartreuse"), "");
    }
}
