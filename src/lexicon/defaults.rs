//! Built-in tables. Each one can be replaced from a file at startup.

pub const FAST_PATH_FAKE_RULES: &[&str] = &[
    "vaccine & autism",
    "flat earth",
    "earth & flat & is",
    "5g & covid|coronavirus",
    "moon landing & fake|hoax|faked",
    "climate & hoax",
    "bleach & cure|cures|treat|treatment",
    "drink & bleach",
];

pub const FAST_PATH_REAL_RULES: &[&str] = &[
    "water & h2o",
    "water & freeze & 0|zero",
    "water & boil & 100",
    "sun & rise & east",
    "earth & orbit & sun",
    "earth & round",
    "earth & sphere",
    "gravity & exist|real|pull",
    "dna & genetic",
    "paris & capital & france",
    "obama & president|44th",
    "human & oxygen & need|breathe",
    "oxygen & breathe",
];

pub const DEBUNK_TERMS: &[&str] = &[
    "false",
    "fake",
    "myth",
    "debunk",
    "incorrect",
    "wrong",
    "misleading",
    "untrue",
    "not true",
    "no evidence",
    "conspiracy theory",
    "hoax",
    "disproven",
    "refuted",
    "fact check: false",
    "claim is false",
    "this is false",
    "misinformation",
    "lacks evidence",
    "unsubstantiated",
    "baseless",
    "fabricated",
    "discredited",
    "despite claims",
    "contrary to",
    "in reality",
    "actually",
    "truth is",
    "scientific consensus",
    "studies show",
    "experts say",
    "research shows",
    "no scientific evidence",
    "no proof",
    "no support",
    "widely debunked",
    "has been debunked",
    "thoroughly debunked",
    "completely false",
    "entirely false",
    "no link",
    "no connection",
    "does not cause",
    "study finds no",
    "experts reject",
    "pseudoscience",
    "anti-science",
    "against science",
    "contradicts science",
];

pub const SUPPORT_TERMS: &[&str] = &[
    "confirmed",
    "verified",
    "true",
    "accurate",
    "correct",
    "factual",
    "legitimate",
    "proven",
    "established",
    "documented",
    "official",
    "evidence shows",
    "studies confirm",
    "research confirms",
    "experts confirm",
    "science shows",
    "peer-reviewed",
    "published in",
    "according to",
    "data shows",
    "cdc",
    "who",
    "nih",
    "fda",
    "reuters",
    "ap news",
    "bbc",
    "scientific american",
    "nature",
    "science journal",
    "government",
    "university",
];

/// Matched against the whole lower-cased URL, so path fragments are allowed.
pub const FACT_CHECKER_MARKERS: &[&str] = &[
    "snopes",
    "factcheck.org",
    "politifact",
    "reuters/fact-check",
    "apnews.com/hub/fact-checking",
    "fullfact",
    "africacheck",
];

pub const AUTHORITATIVE_MARKERS: &[&str] = &[
    "cdc.gov",
    "who.int",
    "nih.gov",
    "nature.com",
    "science.org",
    "gov",
    "edu",
    "bbc.com/news",
    "reuters.com",
    "apnews.com",
];

pub const KNOWN_FAKE_DOMAINS: &[&str] = &[
    "naturalnews.com",
    "infowars.com",
    "beforeitsnews.com",
    "worldtruth.tv",
    "yournewswire.com",
    "neonnettle.com",
    "realfarmacy.com",
    "thelastamericanvagabond.com",
    "newsbreak.com",
    "collective-evolution.com",
    "davidicke.com",
    "activistpost.com",
    "rumormillnews.com",
    "stateofthenation.co",
    "awarenessact.com",
    "trueactivist.com",
    "thefederalistpapers.org",
    "themindunleashed.com",
    "undergroundhealth.com",
    "americannews.com",
    "conservativetribune.com",
    "usapoliticstoday.com",
    "newspunch.com",
    "dcclothesline.com",
];

pub const TRUSTED_DOMAINS: &[&str] = &[
    "cdc.gov",
    "nih.gov",
    "who.int",
    "fda.gov",
    "nasa.gov",
    "usgs.gov",
    "noaa.gov",
    "bbc.com",
    "bbc.co.uk",
    "reuters.com",
    "apnews.com",
    "npr.org",
    "pbs.org",
    "nytimes.com",
    "washingtonpost.com",
    "wsj.com",
    "theguardian.com",
    "economist.com",
    "nature.com",
    "sciencemag.org",
    "science.org",
    "cell.com",
    "thelancet.com",
    "nejm.org",
    "plos.org",
    "pubmed.ncbi.nlm.nih.gov",
    "wikipedia.org",
    "britannica.com",
    "snopes.com",
    "factcheck.org",
    "politifact.com",
    "fullfact.org",
];
