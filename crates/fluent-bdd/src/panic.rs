//! Helpers for rendering panic payloads.

use std::any::Any;

/// Extracts a panic payload into a human-readable message.
///
/// Common string and primitive payloads are rendered directly; anything else
/// becomes an opaque description naming the payload's `TypeId`.
///
/// # Examples
/// ```
/// use fluent_bdd::panic_message;
///
/// let Err(payload) = std::panic::catch_unwind(|| panic!("boom")) else {
///     unreachable!("closure always panics");
/// };
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    macro_rules! try_downcast {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(value) = payload.downcast_ref::<$ty>() {
                    return value.to_string();
                }
            )*
        };
    }

    try_downcast!(&str, String, i32, u32, i64, u64, isize, usize, bool);
    format!(
        "opaque panic payload (TypeId({:?})); panic with a string for detail",
        payload.type_id()
    )
}

#[cfg(test)]
mod tests {
    use super::panic_message;
    use rstest::rstest;
    use std::any::Any;

    #[rstest]
    #[case(Box::new("str payload"), "str payload")]
    #[case(Box::new(String::from("owned payload")), "owned payload")]
    #[case(Box::new(42_i32), "42")]
    #[case(Box::new(7_usize), "7")]
    fn renders_known_payloads(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(panic_message(payload.as_ref()), expected);
    }

    #[test]
    fn describes_opaque_payloads() {
        struct Custom;
        let payload: Box<dyn Any + Send> = Box::new(Custom);
        let rendered = panic_message(payload.as_ref());
        assert!(rendered.starts_with("opaque panic payload"), "{rendered}");
    }
}
