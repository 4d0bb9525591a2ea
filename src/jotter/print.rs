use chrono::Utc;
use colored::Colorize;
use jotter::api::{BookSummary, CmdMessage, DisplayNote, MessageLevel};
use jotter::config::JotConfig;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub fn print_config(config: &JotConfig) {
    for key in ["book", "editor", "api_key"] {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key.bold(), value);
        }
    }
}

pub fn print_books(books: &[BookSummary]) {
    for book in books {
        let marker = if book.is_current { "*" } else { " " };
        let name = if book.is_current {
            book.name.bold()
        } else {
            book.name.normal()
        };
        println!(
            "{} {} {}",
            marker.yellow(),
            name,
            format!("({})", book.note_count).dimmed()
        );
    }
}

/// One line per note. Notes from several books carry a `book:` prefix so the
/// index stays usable with `edit` and `remove`.
pub fn print_notes(notes: &[DisplayNote], with_book: bool) {
    for dn in notes {
        let idx_str = if with_book {
            format!("{}:{}. ", dn.book, dn.index)
        } else {
            format!("{}. ", dn.index)
        };
        let preview: String = dn
            .note
            .content
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH + 2);
        let preview = truncate_to_width(&preview, available);
        let padding = available.saturating_sub(preview.width());
        let stamp = if dn.note.edited_on > 0 {
            dn.note.edited_on
        } else {
            dn.note.added_on
        };

        println!(
            "  {}{}{}{}",
            idx_str.yellow(),
            preview,
            " ".repeat(padding),
            format_time_ago(stamp).dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(epoch_secs: i64) -> String {
    let elapsed = (Utc::now().timestamp() - epoch_secs).max(0) as u64;
    let time_str = Formatter::new().convert(std::time::Duration::from_secs(elapsed));
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
