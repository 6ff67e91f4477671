//! Country, continent and Canadian province lookup from callsigns.

use std::sync::OnceLock;

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::types::Continent::{self, AF, AN, AS, EU, NA, OC, SA};

const LONGEST_PREFIX: usize = 4;

#[rustfmt::skip]
const DXCC_PREFIXES: &[(&str, &str)] = &[
    ("K", "United States"), ("W", "United States"), ("N", "United States"),
    ("A", "United States"), ("VE", "Canada"), ("VA", "Canada"), ("VO", "Canada"),
    ("VY", "Canada"), ("XE", "Mexico"), ("XF", "Mexico"), ("4A", "Mexico"), ("G", "England"),
    ("M", "England"), ("2E", "England"), ("DL", "Germany"), ("DA", "Germany"),
    ("DB", "Germany"), ("DC", "Germany"), ("DD", "Germany"), ("DE", "Germany"),
    ("DF", "Germany"), ("DG", "Germany"), ("DH", "Germany"), ("DI", "Germany"),
    ("DJ", "Germany"), ("DK", "Germany"), ("DM", "Germany"), ("DN", "Germany"),
    ("DO", "Germany"), ("DP", "Germany"), ("DQ", "Germany"), ("DR", "Germany"),
    ("F", "France"), ("TM", "France"), ("TK", "France"), ("I", "Italy"), ("IZ", "Italy"),
    ("EA", "Spain"), ("EB", "Spain"), ("EC", "Spain"), ("ED", "Spain"), ("EE", "Spain"),
    ("EF", "Spain"), ("EG", "Spain"), ("EH", "Spain"), ("CT", "Portugal"), ("CQ", "Portugal"),
    ("CR", "Portugal"), ("CS", "Portugal"), ("PA", "Netherlands"), ("PB", "Netherlands"),
    ("PC", "Netherlands"), ("PD", "Netherlands"), ("PE", "Netherlands"), ("PF", "Netherlands"),
    ("PG", "Netherlands"), ("PH", "Netherlands"), ("PI", "Netherlands"), ("ON", "Belgium"),
    ("OO", "Belgium"), ("OP", "Belgium"), ("OQ", "Belgium"), ("OR", "Belgium"),
    ("OS", "Belgium"), ("OT", "Belgium"), ("HB", "Switzerland"), ("HB0", "Liechtenstein"),
    ("HB9", "Switzerland"), ("OE", "Austria"), ("OK", "Czech Republic"),
    ("OL", "Czech Republic"), ("OM", "Slovak Republic"), ("SP", "Poland"), ("SN", "Poland"),
    ("SO", "Poland"), ("SQ", "Poland"), ("SR", "Poland"), ("YO", "Romania"), ("YP", "Romania"),
    ("YQ", "Romania"), ("YR", "Romania"), ("LZ", "Bulgaria"), ("SV", "Greece"),
    ("SW", "Greece"), ("SX", "Greece"), ("SY", "Greece"), ("SZ", "Greece"), ("YU", "Serbia"),
    ("YT", "Serbia"), ("YZ", "Serbia"), ("9A", "Croatia"), ("S5", "Slovenia"),
    ("T9", "Bosnia-Herzegovina"), ("E7", "Bosnia-Herzegovina"), ("4O", "Montenegro"),
    ("E4", "Palestine"), ("LY", "Lithuania"), ("YL", "Latvia"), ("ES", "Estonia"),
    ("OH", "Finland"), ("SM", "Sweden"), ("SA", "Sweden"), ("SB", "Sweden"), ("SC", "Sweden"),
    ("SD", "Sweden"), ("SE", "Sweden"), ("SF", "Sweden"), ("SG", "Sweden"), ("SH", "Sweden"),
    ("SI", "Sweden"), ("SJ", "Sweden"), ("SK", "Sweden"), ("SL", "Sweden"), ("LA", "Norway"),
    ("LB", "Norway"), ("LC", "Norway"), ("LD", "Norway"), ("LE", "Norway"), ("LF", "Norway"),
    ("LG", "Norway"), ("LH", "Norway"), ("LI", "Norway"), ("LJ", "Norway"), ("LK", "Norway"),
    ("LL", "Norway"), ("LM", "Norway"), ("LN", "Norway"), ("OZ", "Denmark"),
    ("OV", "Faroe Islands"), ("OY", "Faroe Islands"), ("TF", "Iceland"), ("EI", "Ireland"),
    ("EJ", "Ireland"), ("R", "European Russia"), ("U", "European Russia"),
    ("RA", "European Russia"), ("RB", "European Russia"), ("RC", "European Russia"),
    ("RD", "European Russia"), ("RE", "European Russia"), ("RF", "European Russia"),
    ("RG", "European Russia"), ("RH", "European Russia"), ("RI", "European Russia"),
    ("RJ", "European Russia"), ("RK", "European Russia"), ("RL", "European Russia"),
    ("RM", "European Russia"), ("RN", "European Russia"), ("RO", "European Russia"),
    ("RP", "European Russia"), ("RQ", "European Russia"), ("RR", "European Russia"),
    ("RS", "European Russia"), ("RT", "European Russia"), ("RU", "European Russia"),
    ("RV", "European Russia"), ("RW", "European Russia"), ("RX", "European Russia"),
    ("RY", "European Russia"), ("RZ", "European Russia"), ("JA", "Japan"), ("JE", "Japan"),
    ("JF", "Japan"), ("JG", "Japan"), ("JH", "Japan"), ("JI", "Japan"), ("JJ", "Japan"),
    ("JK", "Japan"), ("JL", "Japan"), ("JM", "Japan"), ("JN", "Japan"), ("JO", "Japan"),
    ("JP", "Japan"), ("JQ", "Japan"), ("JR", "Japan"), ("JS", "Japan"), ("HL", "South Korea"),
    ("HM", "South Korea"), ("DS", "South Korea"), ("DT", "South Korea"), ("VU", "India"),
    ("AT", "India"), ("VT", "India"), ("VW", "India"), ("VR", "Hong Kong"),
    ("VR2", "Hong Kong"), ("BY", "China"), ("B", "China"), ("VK", "Australia"),
    ("VH", "Australia"), ("VI", "Australia"), ("VJ", "Australia"), ("ZL", "New Zealand"),
    ("ZK", "New Zealand"), ("ZM", "New Zealand"), ("YB", "Indonesia"), ("YC", "Indonesia"),
    ("YD", "Indonesia"), ("YE", "Indonesia"), ("YF", "Indonesia"), ("YG", "Indonesia"),
    ("YH", "Indonesia"), ("HS", "Thailand"), ("E2", "Thailand"), ("9V", "Singapore"),
    ("9M2", "West Malaysia"), ("9M6", "East Malaysia"), ("DU", "Philippines"),
    ("DV", "Philippines"), ("DW", "Philippines"), ("DX", "Philippines"), ("DY", "Philippines"),
    ("DZ", "Philippines"), ("YK", "Syria"), ("XX", "China"), ("ZS", "South Africa"),
    ("ZR", "South Africa"), ("ZT", "South Africa"), ("ZU", "South Africa"), ("SU", "Egypt"),
    ("SS", "Egypt"), ("CN", "Morocco"), ("5C", "Morocco"), ("7X", "Algeria"),
    ("3V", "Tunisia"), ("5A", "Libya"), ("ST", "Sudan"), ("ET", "Ethiopia"), ("5Z", "Kenya"),
    ("5H", "Tanzania"), ("5X", "Uganda"), ("9X", "Rwanda"), ("9U", "Burundi"),
    ("TL", "Central African Republic"), ("TT", "Chad"), ("TY", "Benin"), ("5V", "Togo"),
    ("9G", "Ghana"), ("9Q", "Democratic Republic of the Congo"),
    ("TN", "Republic of the Congo"), ("TR", "Gabon"), ("3C", "Equatorial Guinea"),
    ("D2", "Angola"), ("V5", "Namibia"), ("A2", "Botswana"), ("7P", "Lesotho"),
    ("3DA", "Swaziland"), ("V9", "Brunei"), ("YJ", "Vanuatu"), ("T3", "Kiribati"),
    ("T2", "Tuvalu"), ("5W", "Samoa"), ("3D2", "Fiji"), ("E5", "Cook Islands"),
    ("FK", "New Caledonia"), ("FO", "French Polynesia"), ("FW", "Wallis and Futuna"),
    ("P2", "Papua New Guinea"), ("P29", "Papua New Guinea"), ("PY", "Brazil"),
    ("PP", "Brazil"), ("PQ", "Brazil"), ("PR", "Brazil"), ("PS", "Brazil"), ("PT", "Brazil"),
    ("PU", "Brazil"), ("PV", "Brazil"), ("PW", "Brazil"), ("PX", "Brazil"), ("ZV", "Brazil"),
    ("ZW", "Brazil"), ("ZX", "Brazil"), ("ZY", "Brazil"), ("ZZ", "Brazil"),
    ("LU", "Argentina"), ("AY", "Argentina"), ("AZ", "Argentina"), ("L2", "Argentina"),
    ("L3", "Argentina"), ("L4", "Argentina"), ("L5", "Argentina"), ("L6", "Argentina"),
    ("L7", "Argentina"), ("L8", "Argentina"), ("L9", "Argentina"), ("LO", "Argentina"),
    ("LP", "Argentina"), ("LQ", "Argentina"), ("LR", "Argentina"), ("LS", "Argentina"),
    ("LT", "Argentina"), ("LV", "Argentina"), ("LW", "Argentina"), ("CE", "Chile"),
    ("CA", "Chile"), ("CB", "Chile"), ("CC", "Chile"), ("CD", "Chile"), ("CF", "Chile"),
    ("CG", "Chile"), ("CH", "Chile"), ("CI", "Chile"), ("CJ", "Chile"), ("CK", "Chile"),
    ("CL", "Chile"), ("CM", "Chile"), ("CO", "Chile"), ("CP", "Bolivia"), ("C7", "Bolivia"),
    ("OA", "Peru"), ("OB", "Peru"), ("OC", "Peru"), ("4T", "Peru"), ("HC", "Ecuador"),
    ("HD", "Ecuador"), ("HE", "Ecuador"), ("HF", "Ecuador"), ("HG", "Ecuador"),
    ("HH", "Ecuador"), ("HI", "Ecuador"), ("HJ", "Colombia"), ("HK", "Colombia"),
    ("5J", "Colombia"), ("5K", "Colombia"), ("YV", "Venezuela"), ("YW", "Venezuela"),
    ("YX", "Venezuela"), ("YY", "Venezuela"), ("4M", "Venezuela"), ("PZ", "Suriname"),
    ("8R", "Guyana"), ("PJ", "Netherlands Antilles"), ("FY", "French Guiana"),
    ("PY0F", "Fernando de Noronha"), ("PY0S", "St. Peter and St. Paul Rocks"),
    ("PY0T", "Trindade and Martim Vaz"),
];

#[rustfmt::skip]
const COUNTRY_CONTINENTS: &[(&str, Continent)] = &[
    ("United States", NA), ("Canada", NA), ("Mexico", NA), ("Alaska", NA), ("Hawaii", NA),
    ("Bahamas", NA), ("Barbados", NA), ("Belize", NA), ("Bermuda", NA), ("Costa Rica", NA),
    ("Cuba", NA), ("Dominican Republic", NA), ("El Salvador", NA), ("Guatemala", NA),
    ("Haiti", NA), ("Honduras", NA), ("Jamaica", NA), ("Nicaragua", NA), ("Panama", NA),
    ("Trinidad and Tobago", NA), ("Cayman Islands", NA), ("Puerto Rico", NA),
    ("US Virgin Islands", NA), ("British Virgin Islands", NA), ("Argentina", SA),
    ("Bolivia", SA), ("Brazil", SA), ("Chile", SA), ("Colombia", SA), ("Ecuador", SA),
    ("French Guiana", SA), ("Guyana", SA), ("Paraguay", SA), ("Peru", SA), ("Suriname", SA),
    ("Uruguay", SA), ("Venezuela", SA), ("Fernando de Noronha", SA),
    ("St. Peter and St. Paul Rocks", SA), ("Trindade and Martim Vaz", SA),
    ("Netherlands Antilles", SA), ("Albania", EU), ("Andorra", EU), ("Armenia", EU),
    ("Austria", EU), ("Azerbaijan", EU), ("Belarus", EU), ("Belgium", EU),
    ("Bosnia-Herzegovina", EU), ("Bulgaria", EU), ("Croatia", EU), ("Cyprus", EU),
    ("Czech Republic", EU), ("Denmark", EU), ("Estonia", EU), ("Finland", EU), ("France", EU),
    ("Georgia", EU), ("Germany", EU), ("Greece", EU), ("Hungary", EU), ("Iceland", EU),
    ("Ireland", EU), ("Italy", EU), ("Latvia", EU), ("Liechtenstein", EU), ("Lithuania", EU),
    ("Luxembourg", EU), ("Malta", EU), ("Moldova", EU), ("Monaco", EU), ("Montenegro", EU),
    ("Netherlands", EU), ("North Macedonia", EU), ("Norway", EU), ("Poland", EU),
    ("Portugal", EU), ("Romania", EU), ("European Russia", EU), ("San Marino", EU),
    ("Serbia", EU), ("Slovak Republic", EU), ("Slovenia", EU), ("Spain", EU), ("Sweden", EU),
    ("Switzerland", EU), ("Turkey", EU), ("Ukraine", EU), ("England", EU), ("Scotland", EU),
    ("Wales", EU), ("Northern Ireland", EU), ("Faroe Islands", EU), ("Gibraltar", EU),
    ("Guernsey", EU), ("Isle of Man", EU), ("Jersey", EU), ("Vatican", EU), ("Algeria", AF),
    ("Angola", AF), ("Benin", AF), ("Botswana", AF), ("Burkina Faso", AF), ("Burundi", AF),
    ("Cameroon", AF), ("Cape Verde", AF), ("Central African Republic", AF), ("Chad", AF),
    ("Comoros", AF), ("Democratic Republic of the Congo", AF), ("Republic of the Congo", AF),
    ("Djibouti", AF), ("Egypt", AF), ("Equatorial Guinea", AF), ("Eritrea", AF),
    ("Ethiopia", AF), ("Gabon", AF), ("Gambia", AF), ("Ghana", AF), ("Guinea", AF),
    ("Guinea-Bissau", AF), ("Ivory Coast", AF), ("Kenya", AF), ("Lesotho", AF),
    ("Liberia", AF), ("Libya", AF), ("Madagascar", AF), ("Malawi", AF), ("Mali", AF),
    ("Mauritania", AF), ("Mauritius", AF), ("Morocco", AF), ("Mozambique", AF),
    ("Namibia", AF), ("Niger", AF), ("Nigeria", AF), ("Rwanda", AF),
    ("Sao Tome and Principe", AF), ("Senegal", AF), ("Seychelles", AF), ("Sierra Leone", AF),
    ("Somalia", AF), ("South Africa", AF), ("South Sudan", AF), ("Sudan", AF),
    ("Swaziland", AF), ("Tanzania", AF), ("Togo", AF), ("Tunisia", AF), ("Uganda", AF),
    ("Zambia", AF), ("Zimbabwe", AF), ("Afghanistan", AS), ("Bahrain", AS), ("Bangladesh", AS),
    ("Bhutan", AS), ("Brunei", AS), ("Cambodia", AS), ("China", AS), ("Hong Kong", AS),
    ("India", AS), ("Indonesia", AS), ("Iran", AS), ("Iraq", AS), ("Israel", AS),
    ("Japan", AS), ("Jordan", AS), ("Kazakhstan", AS), ("Kuwait", AS), ("Kyrgyzstan", AS),
    ("Laos", AS), ("Lebanon", AS), ("Macao", AS), ("Malaysia", AS), ("West Malaysia", AS),
    ("East Malaysia", AS), ("Maldives", AS), ("Mongolia", AS), ("Myanmar", AS), ("Nepal", AS),
    ("North Korea", AS), ("Oman", AS), ("Pakistan", AS), ("Palestine", AS),
    ("Philippines", AS), ("Qatar", AS), ("Saudi Arabia", AS), ("Singapore", AS),
    ("South Korea", AS), ("Sri Lanka", AS), ("Syria", AS), ("Taiwan", AS), ("Tajikistan", AS),
    ("Thailand", AS), ("Timor-Leste", AS), ("Turkmenistan", AS), ("United Arab Emirates", AS),
    ("Uzbekistan", AS), ("Vietnam", AS), ("Yemen", AS), ("Asiatic Russia", AS),
    ("Australia", OC), ("Cook Islands", OC), ("Fiji", OC), ("French Polynesia", OC),
    ("Kiribati", OC), ("Marshall Islands", OC), ("Micronesia", OC), ("Nauru", OC),
    ("New Caledonia", OC), ("New Zealand", OC), ("Palau", OC), ("Papua New Guinea", OC),
    ("Samoa", OC), ("Solomon Islands", OC), ("Tonga", OC), ("Tuvalu", OC), ("Vanuatu", OC),
    ("Wallis and Futuna", OC), ("Antarctica", AN),
];

fn prefix_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| DXCC_PREFIXES.iter().copied().collect())
}

fn continent_table() -> &'static HashMap<&'static str, Continent> {
    static TABLE: OnceLock<HashMap<&'static str, Continent>> = OnceLock::new();
    TABLE.get_or_init(|| COUNTRY_CONTINENTS.iter().copied().collect())
}

/// Country for a normalized call, by longest matching prefix.
pub fn country_of(call: &str) -> Option<&'static str> {
    let base = call.split('/').next().unwrap_or(call);
    let table = prefix_table();
    let max = base.len().min(LONGEST_PREFIX);
    (1..=max)
        .rev()
        .filter(|len| base.is_char_boundary(*len))
        .find_map(|len| table.get(&base[..len]).copied())
}

/// Continent of a country name as returned by [`country_of`].
pub fn continent_of_country(country: &str) -> Option<Continent> {
    continent_table().get(country).copied()
}

/// Table spelling of a country name, matched case-insensitively.
pub fn canonical_country(name: &str) -> Option<&'static str> {
    let wanted = name.trim();
    COUNTRY_CONTINENTS
        .iter()
        .map(|(country, _)| *country)
        .chain(DXCC_PREFIXES.iter().map(|(_, country)| *country))
        .find(|country| country.eq_ignore_ascii_case(wanted))
}

/// Continent for a normalized call.
pub fn continent_of(call: &str) -> Option<Continent> {
    country_of(call).and_then(continent_of_country)
}

/// Canadian province or territory recognised by the Maple award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Province {
    /// Short code such as `ON`.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// First date on which contacts with this area count.
    pub counts_from: NaiveDate,
}

const PROVINCES_FROM: (i32, u32, u32) = (2009, 9, 1);
const TERRITORIES_FROM: (i32, u32, u32) = (2014, 1, 1);

#[rustfmt::skip]
const CANADIAN_PREFIXES: &[(&str, &str, &str, bool)] = &[
    ("VA1", "NS", "Nova Scotia", false), ("VE1", "NS", "Nova Scotia", false),
    ("VA2", "QC", "Quebec", false), ("VE2", "QC", "Quebec", false),
    ("VA3", "ON", "Ontario", false), ("VE3", "ON", "Ontario", false),
    ("VA4", "MB", "Manitoba", false), ("VE4", "MB", "Manitoba", false),
    ("VA5", "SK", "Saskatchewan", false), ("VE5", "SK", "Saskatchewan", false),
    ("VA6", "AB", "Alberta", false), ("VE6", "AB", "Alberta", false),
    ("VA7", "BC", "British Columbia", false), ("VE7", "BC", "British Columbia", false),
    ("VE8", "NT", "Northwest Territories", true),
    ("VE9", "NB", "New Brunswick", false),
    ("VO1", "NL", "Newfoundland", false),
    ("VO2", "LB", "Labrador", false),
    ("VY0", "NU", "Nunavut", true),
    ("VY1", "YT", "Yukon", true),
    ("VY2", "PE", "Prince Edward Island", true),
    ("VY9", "GOV", "Government of Canada", false),
    ("VE0", "SEA", "Stations at sea", false),
];

/// Province or territory for a normalized Canadian call.
pub fn province_of(call: &str) -> Option<Province> {
    let base = call.split('/').next().unwrap_or(call);
    let &(_, code, name, territory) = CANADIAN_PREFIXES
        .iter()
        .find(|(prefix, ..)| base.starts_with(prefix))?;
    let (y, m, d) = if territory { TERRITORIES_FROM } else { PROVINCES_FROM };
    Some(Province {
        code,
        name,
        counts_from: NaiveDate::from_ymd_opt(y, m, d)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(country_of("HB0XYZ"), Some("Liechtenstein"));
        assert_eq!(country_of("HB9ABC"), Some("Switzerland"));
        assert_eq!(country_of("W1ABC"), Some("United States"));
        assert_eq!(country_of("9M6AB"), Some("East Malaysia"));
        assert_eq!(country_of("QQ1"), None);
    }

    #[test]
    fn continents_from_calls() {
        assert_eq!(continent_of("JA1XYZ"), Some(AS));
        assert_eq!(continent_of("ZS6AA"), Some(AF));
        assert_eq!(continent_of("VK2AB"), Some(OC));
        assert_eq!(continent_of("PY2AA"), Some(SA));
        assert_eq!(continent_of("DL1AA"), Some(EU));
        assert_eq!(continent_of_country("Antarctica"), Some(AN));
    }

    #[test]
    fn territories_open_later() {
        let on = province_of("VE3ABC").expect("ontario");
        let yt = province_of("VY1AA").expect("yukon");
        assert_eq!(on.code, "ON");
        assert!(yt.counts_from > on.counts_from);
        assert!(province_of("W1ABC").is_none());
    }
}
