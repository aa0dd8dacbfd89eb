/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Wall-clock time of day for activity entries.
pub fn clock_label() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        String::from(js_sys::Date::new_0().to_locale_time_string("en-US"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        format_time_of_day(unix_millis())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn format_time_of_day(millis: f64) -> String {
    let secs = (millis / 1000.0) as u64 % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
