use crate::outcome::{QueryFailure, QueryOutcome};

/// Something the presentation layer can produce for the two non-success states.
pub trait View {
    /// The standardized view for a failed outcome. Must carry `failure.message`.
    fn error(failure: &QueryFailure) -> Self;

    /// The neutral view shown before the first outcome exists.
    fn loading() -> Self;
}

/// Plain-text views, used by the terminal renderer and in tests.
impl View for String {
    fn error(failure: &QueryFailure) -> Self {
        format!("Error: {}", failure.message)
    }

    fn loading() -> Self {
        "Loading...".to_string()
    }
}

/// The guard between query results and presentation code.
///
/// The success renderer only ever sees data from a `Success`; a `Failure` is turned into the
/// error view without calling it.
///
/// Gates nest, and the first failing outcome decides the view:
///
/// ```
/// use core_types::{OutcomeGate, QueryOutcome};
///
/// let users: QueryOutcome<Vec<u32>> = QueryOutcome::Success(vec![1, 2]);
/// let products: QueryOutcome<Vec<u32>> = QueryOutcome::Success(vec![7]);
/// let view: String = OutcomeGate::render(users, |users| {
///     OutcomeGate::render(products, |products| format!("{} users, {} products", users.len(), products.len()))
/// });
/// assert_eq!(view, "2 users, 1 products");
/// ```
pub struct OutcomeGate;

impl OutcomeGate {
    pub fn render<T, V: View>(outcome: QueryOutcome<T>, on_success: impl FnOnce(T) -> V) -> V {
        match outcome {
            QueryOutcome::Success(data) => on_success(data),
            QueryOutcome::Failure(failure) => {
                tracing::debug!(kind = ?failure.kind, message = %failure.message, "Rendering error view.");
                V::error(&failure)
            }
        }
    }

    /// Like `render`, for outcomes that may not exist yet.
    pub fn render_pending<T, V: View>(
        outcome: Option<QueryOutcome<T>>,
        on_success: impl FnOnce(T) -> V,
    ) -> V {
        match outcome {
            None => V::loading(),
            Some(outcome) => Self::render(outcome, on_success),
        }
    }
}
