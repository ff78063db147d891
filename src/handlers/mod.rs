// Two security tiers:
// public (no auth) and protected (bearer token, plus ownership on mutations)
pub mod protected;
pub mod public;
