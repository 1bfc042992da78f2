pub mod booking;
pub mod history;
pub mod schedule;


pub use booking::{Booking, BookingStatus, NewBooking, StatusUpdate};
pub use history::{NewHistoryEntry, StatusHistoryEntry};
pub use schedule::{BreakInterval, DateRange, DaySchedule, ScheduleConfig};
