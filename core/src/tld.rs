// core/src/tld.rs

//! Query splitting and the fixed valid-TLD allow-list.

/// Extensions a search query may carry. A query whose extension is absent
/// from this list short-circuits the availability check with an
/// invalid-TLD result before any network call.
pub const VALID_TLDS: &[&str] = &[
  ".com", ".org", ".net", ".edu", ".gov", ".mil", ".int", ".info", ".biz",
  ".name", ".pro", ".io", ".co", ".ai", ".app", ".dev", ".tech", ".xyz",
  ".online", ".site", ".website", ".store", ".shop", ".blog", ".news",
  ".cloud", ".digital", ".agency", ".studio", ".design", ".media", ".live",
  ".life", ".world", ".today", ".space", ".host", ".fun", ".club", ".vip",
  ".me", ".tv", ".cc", ".us", ".uk", ".ca", ".au", ".nz", ".de", ".fr",
  ".es", ".it", ".nl", ".be", ".ch", ".at", ".se", ".no", ".dk", ".fi",
  ".pl", ".cz", ".pt", ".ie", ".gr", ".ro", ".hu", ".tr", ".ru", ".ua",
  ".cn", ".jp", ".kr", ".in", ".pk", ".bd", ".lk", ".th", ".vn", ".ph",
  ".my", ".sg", ".id", ".br", ".mx", ".ar", ".cl", ".pe", ".za", ".ng",
  ".ke", ".gh", ".tz", ".ug", ".et", ".so", ".dj", ".eg", ".ma", ".ae",
  ".sa", ".qa", ".kw", ".om", ".jo",
];

/// The base name of a query: everything before the last `.`, or the whole
/// query when it contains none.
pub fn base_name(query: &str) -> &str {
  match query.rfind('.') {
    Some(idx) => &query[..idx],
    None => query,
  }
}

/// The `.`-prefixed extension of a query, when present.
pub fn extension(query: &str) -> Option<&str> {
  query.rfind('.').map(|idx| &query[idx..])
}

/// Case-insensitive membership test against [`VALID_TLDS`].
pub fn is_valid_tld(tld: &str) -> bool {
  let wanted = tld.to_ascii_lowercase();
  VALID_TLDS.iter().any(|t| *t == wanted)
}
