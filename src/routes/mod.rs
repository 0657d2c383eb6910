pub mod appointments;
pub mod bookings;
pub mod checkin;

/// A request field counts as missing when the key is absent or the value is
/// an empty string.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
