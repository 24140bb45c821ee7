//! Color utilities for CLI output

use console::{Style, StyledObject};

/// Style an exit code: zero green, anything else red bold
pub fn exit_code_style(code: i32) -> StyledObject<i32> {
    let style = if code == 0 {
        Style::new().green()
    } else {
        Style::new().red().bold()
    };
    style.apply_to(code)
}
