/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Three digit counter, negative values keep the sign in front.
pub(crate) fn format_for_counter(value: i64) -> String {
    if value < 0 {
        format!("-{:02}", value.unsigned_abs().min(99))
    } else {
        format!("{:03}", value.min(999))
    }
}

/// The clock grows with every bonus, so it is shown in full rather than as a 3 digit counter.
pub(crate) fn format_time_left(remaining: u32) -> String {
    format!("{}s", remaining)
}
