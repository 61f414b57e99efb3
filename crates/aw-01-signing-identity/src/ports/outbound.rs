//! # Outbound Ports (Driven Ports)
//!
//! Configuration source the identity is loaded from.

/// Name of the variable holding the JWK document.
pub const JWK_VARIABLE: &str = "ARXWEAVE_JWK";

/// Prefix of the numbered variables holding split pieces of `d`.
pub const JWK_D_PART_PREFIX: &str = "ARXWEAVE_JWK_D_";

/// Upper bound on split pieces, so a misconfigured source cannot loop forever.
pub const MAX_D_PARTS: usize = 64;

/// Key/value configuration source.
pub trait KeySource: Send + Sync {
    /// Look up a variable.
    fn get(&self, key: &str) -> Option<String>;

    /// Split pieces of the private member in index order.
    ///
    /// Reads `ARXWEAVE_JWK_D_0`, `ARXWEAVE_JWK_D_1`, ... and stops at the
    /// first missing index.
    fn d_parts(&self) -> Vec<String> {
        (0..MAX_D_PARTS)
            .map_while(|i| self.get(&format!("{JWK_D_PART_PREFIX}{i}")))
            .collect()
    }
}
