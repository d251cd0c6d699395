use rust_decimal::Decimal;

/// Ordered futures root → dollar value of a one-point move per contract,
/// stored as (root, mantissa, scale). Micro roots are listed ahead of their
/// parent roots so `MNQ` resolves before `NQ` does. Matching is
/// case-insensitive substring over the full contract code (so `NQZ5` still
/// resolves), which is a deliberate heuristic; anything unmatched is
/// treated as a plain 1:1 instrument.
const POINT_VALUES: &[(&str, i64, u32)] = &[
    // Micros first
    ("MNQ", 2, 0),
    ("MES", 5, 0),
    ("M2K", 5, 0),
    ("MYM", 5, 1),
    ("MGC", 10, 0),
    ("MCL", 100, 0),
    ("SIL", 1000, 0),
    // Full-size index
    ("NQ", 20, 0),
    ("ES", 50, 0),
    ("RTY", 50, 0),
    ("YM", 5, 0),
    // Metals & energy
    ("GC", 100, 0),
    ("CL", 1000, 0),
    ("SI", 5000, 0),
    ("NG", 10000, 0),
    ("HG", 25000, 0),
    // Rates
    ("ZB", 1000, 0),
    ("ZN", 1000, 0),
    ("ZF", 1000, 0),
];

/// Resolve the point value for a symbol. First matching root wins; unknown
/// symbols (equities, anything not in the table) get 1.
pub fn point_value(symbol: &str) -> Decimal {
    let sym = symbol.trim().to_uppercase();
    for (root, mantissa, scale) in POINT_VALUES {
        if sym.contains(root) {
            return Decimal::new(*mantissa, *scale);
        }
    }
    Decimal::ONE
}
