use subswap_products::Product;

/// Audit note text recorded on the subscription after a swap.
pub fn audit_note(prefix: &str, swap_out: &Product, swap_in: &Product) -> String {
    format!(
        "{prefix} - Swapped out \"{}\" (ID: {}) for \"{}\" (ID: {})",
        swap_out.name(),
        swap_out.id_typed(),
        swap_in.name(),
        swap_in.id_typed(),
    )
}
