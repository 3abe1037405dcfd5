//! Plain-text pickup ticket
//!
//! The display call number is the largest element on the ticket; everything
//! else is secondary.

use shared::DisplayRange;
use shared::models::{Order, TimeSlot};

/// Default ticket width in columns (58mm thermal paper)
pub const RECEIPT_WIDTH: usize = 32;

/// Column width of a char: East Asian wide/fullwidth glyphs take two columns
fn char_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6 => 2,
        _ => 1,
    }
}

pub fn text_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Truncate to at most `max` columns
fn truncate(s: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = char_width(c);
        if width + w > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out
}

/// Line-oriented text builder
#[derive(Debug)]
pub struct TicketBuilder {
    buf: String,
    width: usize,
}

impl TicketBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn center(&mut self, s: &str) -> &mut Self {
        let w = text_width(s);
        if w >= self.width {
            return self.line(s);
        }
        let pad = (self.width - w) / 2;
        let line = format!("{}{}", " ".repeat(pad), s);
        self.line(&line)
    }

    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.width);
        self.line(&sep)
    }

    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.width);
        self.line(&sep)
    }

    /// Left text left-aligned, right text right-aligned
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let rw = text_width(right);
        if rw + 1 >= self.width {
            self.line(left);
            return self.line(right);
        }
        let left = truncate(left, self.width - rw - 1);
        let spaces = self.width - text_width(&left) - rw;
        let line = format!("{left}{}{right}", " ".repeat(spaces));
        self.line(&line)
    }

    pub fn build(self) -> String {
        self.buf
    }
}

fn yen(amount: i64) -> String {
    format!("¥{amount}")
}

/// Render the pickup ticket for an order
pub fn render_receipt(order: &Order, slot: Option<&TimeSlot>, range: &DisplayRange) -> String {
    let call_no = range.display(order.call_number);
    let mut b = TicketBuilder::new(RECEIPT_WIDTH);

    b.sep_double()
        .center("CALL NUMBER")
        .newline()
        .center(&format!("*** No. {call_no} ***"))
        .newline()
        .sep_double();

    if let Some(slot) = slot {
        b.line_lr("Pickup", &slot.label);
    }
    b.line_lr("Order", &order.id.to_string())
        .line_lr("Status", order.status.as_str())
        .sep_single();

    for item in &order.items {
        let left = format!("{} x{}", item.name, item.quantity);
        b.line_lr(&left, &yen(item.line_total));
    }

    b.sep_single()
        .line_lr("TOTAL", &yen(order.total))
        .sep_double()
        .center("Please wait for your number");

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderItem, OrderStatus};

    fn order() -> Order {
        Order {
            id: 42,
            user_id: "u1".into(),
            time_slot_id: 7,
            status: OrderStatus::Paid,
            total: 1230,
            call_number: 300,
            created_at: 0,
            updated_at: 0,
            items: vec![
                OrderItem {
                    id: 1,
                    order_id: 42,
                    product_id: 10,
                    name: "Katsu curry".into(),
                    unit_price: 480,
                    quantity: 2,
                    line_total: 960,
                },
                OrderItem {
                    id: 2,
                    order_id: 42,
                    product_id: 11,
                    name: "味噌汁".into(),
                    unit_price: 270,
                    quantity: 1,
                    line_total: 270,
                },
            ],
        }
    }

    #[test]
    fn test_receipt_shows_display_number() {
        let text = render_receipt(&order(), None, &DisplayRange::default());
        // 300 % 99 + 201
        assert!(text.contains("No. 204"));
        assert!(!text.contains("No. 300"));
        assert!(text.contains("¥1230"));
        assert!(text.contains("Katsu curry x2"));
    }

    #[test]
    fn test_receipt_lines_fit_width() {
        let slot = TimeSlot {
            id: 7,
            label: "12:10-12:20".into(),
            starts_at: 0,
            capacity: 10,
            remaining: 3,
            created_at: 0,
        };
        let text = render_receipt(&order(), Some(&slot), &DisplayRange::default());
        assert!(text.contains("12:10-12:20"));
        for line in text.lines() {
            assert!(text_width(line) <= RECEIPT_WIDTH, "line too wide: {line:?}");
        }
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(text_width("abc"), 3);
        assert_eq!(text_width("味噌汁"), 6);
    }

    #[test]
    fn test_line_lr_truncates_long_left_text() {
        let mut b = TicketBuilder::new(16);
        b.line_lr("a very long product name", "¥100");
        let text = b.build();
        let line = text.lines().next().unwrap();
        assert_eq!(text_width(line), 16);
        assert!(line.ends_with("¥100"));
    }
}
