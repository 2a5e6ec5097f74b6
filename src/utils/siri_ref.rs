/// Short name of a SIRI reference: the part after the last `_`, so
/// `MTA NYCT_SIM26` becomes `SIM26`. References without `_` come back whole.
pub fn short_name(reference: &str) -> &str {
    match reference.rsplit_once('_') {
        Some((_, name)) => name,
        None => reference,
    }
}
