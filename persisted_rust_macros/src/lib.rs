mod model;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Model)]
// ============================================================================

/// Derive macro that implements `persisted_rust::Model` for a serde struct.
///
/// The struct must hold a `persisted_rust::Tracker` field (skipped by serde)
/// that records the last clean state of the instance.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Serialize, Deserialize, Model)]
/// #[model(primary_key = "id")]
/// struct User {
///     #[serde(default)]
///     id: Option<String>,
///     name: String,
///     #[serde(skip)]
///     #[model(tracker)]
///     tracker: Tracker,
/// }
/// ```
///
/// - `primary_key` defaults to `"id"` when the struct attribute is omitted.
/// - The tracker field defaults to a field named `tracker`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
