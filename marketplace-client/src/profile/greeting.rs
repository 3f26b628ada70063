use chrono::{Local, Timelike};

/// Приветствие для часа суток `0..=23`.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..12 => "Good Morning!",
        12..=17 => "Good Afternoon!",
        _ => "Good Evening!",
    }
}

/// Приветствие для текущего локального времени.
pub fn greeting_now() -> &'static str {
    greeting(Local::now().hour())
}
