//! Toast-style notifications on stderr

use colored::Colorize;

pub fn success(message: &str) {
    eprintln!("{} {}", "✅", message.green());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "❌", message.red());
}

pub fn info(message: &str) {
    eprintln!("{} {}", "💡", message);
}
