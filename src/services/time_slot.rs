use chrono::{Local, Timelike};

/// One-hour check-in window within the operating day.
pub struct TimeSlot {
    pub start: u32,
    pub end: u32,
}

pub const TIME_SLOTS: [TimeSlot; 8] = [
    TimeSlot { start: 9, end: 10 },
    TimeSlot { start: 10, end: 11 },
    TimeSlot { start: 11, end: 12 },
    TimeSlot { start: 12, end: 13 },
    TimeSlot { start: 13, end: 14 },
    TimeSlot { start: 14, end: 15 },
    TimeSlot { start: 15, end: 16 },
    TimeSlot { start: 16, end: 17 },
];

fn format_12_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let h = if hour % 12 == 0 { 12 } else { hour % 12 };
    format!("{} {}", h, period)
}

pub fn slot_label(slot: &TimeSlot) -> String {
    format!("{} - {}", format_12_hour(slot.start), format_12_hour(slot.end))
}

/// Current slot if the hour falls inside one, otherwise the next upcoming
/// slot, otherwise the last slot of the day. Deterministic given the hour.
pub fn slot_label_for_hour(hour: u32) -> String {
    if let Some(slot) = TIME_SLOTS.iter().find(|s| hour >= s.start && hour < s.end) {
        return slot_label(slot);
    }
    if let Some(next) = TIME_SLOTS.iter().find(|s| s.start > hour) {
        return slot_label(next);
    }
    slot_label(&TIME_SLOTS[TIME_SLOTS.len() - 1])
}

pub fn auto_time_slot() -> String {
    slot_label_for_hour(Local::now().hour())
}
