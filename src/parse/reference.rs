//! The published DCML regular expression, for cross-checking the parser
//!
//! Only compiled with the `regex` feature. The hand-written grammar is
//! stricter in three places: specials take no accidentals, a relative
//! root chain has no trailing `/`, and `-` is not a change prefix (it
//! separates alternatives).

use once_cell::sync::Lazy;
use regex::Regex;

pub const DCML_REGEX: &str = r"(?x)
    ^(\.?
        ((?P<globalkey>[a-gA-G](b*|\#*))\.)?
        ((?P<localkey>(b*|\#*)(VII|VI|V|IV|III|II|I|vii|vi|v|iv|iii|ii|i))\.)?
        ((?P<pedal>(b*|\#*)(VII|VI|V|IV|III|II|I|vii|vi|v|iv|iii|ii|i))\[)?
        (?P<chord>
            (?P<numeral>(b*|\#*)(VII|VI|V|IV|III|II|I|vii|vi|v|iv|iii|ii|i|Ger|It|Fr|@none))
            (?P<form>(%|o|\+|M|\+M))?
            (?P<figbass>(7|65|43|42|2|64|6))?
            (\((?P<changes>((\+|-|\^)?(b*|\#*)\d)+)\))?
            (/(?P<relativeroot>((b*|\#*)(VII|VI|V|IV|III|II|I|vii|vi|v|iv|iii|ii|i)/?)*))?
        )
        (?P<pedalend>\])?
    )?
    (?P<phraseend>(\\\\|\{|\}|\}\{))?$
";

static DCML: Lazy<Option<Regex>> = Lazy::new(|| match Regex::new(DCML_REGEX) {
    Ok(re) => Some(re),
    Err(e) => {
        log::error!("DCML regex does not compile: {}", e);
        None
    }
});

/// Named groups of a regex match, as text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceFeatures {
    pub globalkey: Option<String>,
    pub localkey: Option<String>,
    pub pedal: Option<String>,
    pub numeral: Option<String>,
    pub form: Option<String>,
    pub figbass: Option<String>,
    pub changes: Option<String>,
    pub relativeroot: Option<String>,
    pub pedal_end: bool,
    pub phrase_end: Option<String>,
}

/// Split a label with the regular expression; `None` when it does not match
pub fn reference_features(label: &str) -> Option<ReferenceFeatures> {
    let captures = DCML.as_ref()?.captures(label)?;
    let group = |name: &str| {
        captures
            .name(name)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty())
    };
    Some(ReferenceFeatures {
        globalkey: group("globalkey"),
        localkey: group("localkey"),
        pedal: group("pedal"),
        numeral: group("numeral"),
        form: group("form"),
        figbass: group("figbass"),
        changes: group("changes"),
        relativeroot: group("relativeroot"),
        pedal_end: group("pedalend").is_some(),
        phrase_end: group("phraseend"),
    })
}
