// crates/sweepdb-core/src/traits.rs
use crate::text::fold_key;

/// Name-based matching helpers for types that expose a display label.
///
/// Implementors provide a `&str` view of their name via
/// [`NameMatch::name_str`], and get accent- and case-insensitive helpers
/// built on [`fold_key`]:
/// - [`NameMatch::is_named`]: equality on folded form
/// - [`NameMatch::name_contains`]: substring match on folded form
///
/// # Examples
/// ```rust
/// use sweepdb_core::traits::NameMatch;
///
/// struct Street(&'static str);
/// impl NameMatch for Street {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Street("N Milwaukee Ave").name_contains("milwaukee"));
/// assert!(Street("Peñalolén").is_named("penalolen"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    #[inline]
    fn is_named(&self, q: &str) -> bool {
        fold_key(self.name_str()) == fold_key(q)
    }

    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}
