//! Selector instrumentation, compiled out without the `tracing` feature.
//!
//! Every selector call runs inside one `select` span whose `op` field is the
//! selector name, and finishes with a single event carrying the number of
//! entries that survived. Filter with `RUST_LOG=sparsify=info`.

/// Opens the `select` span for operation `$op` plus any extra fields.
#[cfg(feature = "tracing")]
macro_rules! select_span {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info_span!("select", op = $op $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! select_span {
    ($op:expr $(, $($field:tt)*)?) => {{
        let _ = $op;
        $crate::trace::DisabledSpan
    }};
}

/// Records how many entries a selector kept across the whole batch.
#[cfg(feature = "tracing")]
macro_rules! select_done {
    ($kept:expr) => {
        tracing::info!(kept = $kept, "selection finished")
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! select_done {
    ($kept:expr) => {
        let _ = $kept;
    };
}

pub(crate) use select_done;
pub(crate) use select_span;

/// Guard returned by `select_span!` when the `tracing` feature is off.
#[cfg(not(feature = "tracing"))]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    /// Same shape as `tracing::Span::entered`; does nothing.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    #[test]
    fn disabled_macros_still_evaluate_their_arguments() {
        let mut evaluated = 0;
        let _span = select_span!({
            evaluated += 1;
            "extrema_1d"
        })
        .entered();
        select_done!({
            evaluated += 1;
            3usize
        });
        assert_eq!(evaluated, 2);
    }
}
