/// Large-cap names researched for every recommendation run.
pub const LARGE_CAPS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "BRK.B", "JPM", "V", "MA", "JNJ",
    "PG", "UNH", "XOM", "HD", "CVX", "AVGO", "LLY", "MRK", "PEP", "KO", "ABBV", "COST", "ORCL",
    "TMO", "ASML", "WMT", "BAC", "PFE", "ADBE", "CRM", "ACN", "DIS", "NFLX", "INTC", "CSCO",
    "AMD", "NKE", "VZ", "CMCSA", "MCD", "IBM", "CAT", "QCOM", "TXN", "HON", "GE", "GS", "AMGN",
    "AMAT", "BMY", "SBUX", "NOW", "LIN", "UPS", "MS", "BLK", "SPGI", "RTX", "COP", "DE", "LMT",
    "BKNG", "ADP", "AMT", "CB", "LOW", "UNP", "MDT", "C", "PYPL", "PLD", "SCHW", "T", "CVS",
    "MO", "ELV", "AXON", "REGN", "CI", "ISRG", "ZTS", "GILD", "PGR", "DHR", "MU", "SYK", "MMC",
    "AON", "INTU", "ADI", "PANW", "CHTR", "HCA", "CL", "EQIX", "CME", "ICE", "FISV", "SHW",
    "NEE", "SO", "DUK", "PNC",
];

/// Small caps that widen the pool beyond the index heavyweights.
pub const SMALL_CAPS: &[&str] = &[
    "FIZZ", "CROX", "UPST", "SKLZ", "BIGC", "RUN", "BLNK", "PLUG", "SAVA", "FLGT", "EBIX",
    "GPRO", "NNOX", "RIOT", "MARA", "CLSK", "HUT", "EXPI", "STEM", "NVTA", "BEEM", "DM", "WKHS",
    "RIDE", "SOLO", "NKLA", "VLTA", "EVGO", "SPWR", "DNA", "BLUE", "CRSP", "EDIT", "NTLA",
    "IONQ", "QS", "LTHM", "LUMN", "BB", "APRN", "PRTYQ", "HNST", "BODY", "BYRN", "VUZI", "MARK",
    "BNGO", "ATER", "LOTZ", "VLD", "BARK",
];

pub fn tickers() -> impl Iterator<Item = &'static str> {
    LARGE_CAPS.iter().chain(SMALL_CAPS.iter()).copied()
}
