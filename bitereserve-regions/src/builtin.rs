//! Hand-maintained alias and slug tables shipped with the resolver.
//!
//! Matching is literal: every spelling that occurs in data (with and without
//! diacritics, historical names, "Country, Region" composites) needs its own
//! entry. Extend at runtime with an overlay rather than editing in place when
//! a run reports unmapped regions.

/// Country and region names mapped to ISO-3166 alpha-2 codes.
pub(crate) const COUNTRY_ALIASES: &[(&str, &str)] = &[
    // Europe
    ("Albania", "AL"),
    ("Andorra", "AD"),
    ("Austria", "AT"),
    ("Österreich", "AT"),
    ("Oesterreich", "AT"),
    ("Belgium", "BE"),
    ("België", "BE"),
    ("Belgique", "BE"),
    ("Bosnia and Herzegovina", "BA"),
    ("Bosnia & Herzegovina", "BA"),
    ("Bulgaria", "BG"),
    ("Croatia", "HR"),
    ("Hrvatska", "HR"),
    ("Cyprus", "CY"),
    ("Czechia", "CZ"),
    ("Czech Republic", "CZ"),
    ("Denmark", "DK"),
    ("Danmark", "DK"),
    ("Estonia", "EE"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("France, Corsica", "FR"),
    ("Germany", "DE"),
    ("Deutschland", "DE"),
    ("Greece", "GR"),
    ("Greece, Crete", "GR"),
    ("Hellas", "GR"),
    ("Hungary", "HU"),
    ("Iceland", "IS"),
    ("Ísland", "IS"),
    ("Ireland", "IE"),
    ("Republic of Ireland", "IE"),
    ("Italy", "IT"),
    ("Italia", "IT"),
    ("Italy, Sicily", "IT"),
    ("Italy, Sardinia", "IT"),
    ("Latvia", "LV"),
    ("Liechtenstein", "LI"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Malta", "MT"),
    ("Monaco", "MC"),
    ("Montenegro", "ME"),
    ("Netherlands", "NL"),
    ("The Netherlands", "NL"),
    ("Holland", "NL"),
    ("Nederland", "NL"),
    ("North Macedonia", "MK"),
    ("Macedonia", "MK"),
    ("Norway", "NO"),
    ("Norge", "NO"),
    ("Poland", "PL"),
    ("Polska", "PL"),
    ("Portugal", "PT"),
    ("Portugal, Madeira", "PT"),
    ("Portugal, Azores", "PT"),
    ("Romania", "RO"),
    ("San Marino", "SM"),
    ("Serbia", "RS"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("Spain", "ES"),
    ("España", "ES"),
    ("Espana", "ES"),
    ("Spain, Canary Islands", "ES"),
    ("Spain, Balearic Islands", "ES"),
    ("Sweden", "SE"),
    ("Sverige", "SE"),
    ("Switzerland", "CH"),
    ("Schweiz", "CH"),
    ("Suisse", "CH"),
    ("Türkiye", "TR"),
    ("Turkiye", "TR"),
    ("Turkey", "TR"),
    ("Ukraine", "UA"),
    ("United Kingdom", "GB"),
    ("UK", "GB"),
    ("Great Britain", "GB"),
    ("England", "GB"),
    ("Scotland", "GB"),
    ("Wales", "GB"),
    ("Northern Ireland", "GB"),
    ("United Kingdom, England", "GB"),
    ("United Kingdom, Scotland", "GB"),
    ("Vatican City", "VA"),
    // Americas
    ("Argentina", "AR"),
    ("Bahamas", "BS"),
    ("The Bahamas", "BS"),
    ("Barbados", "BB"),
    ("Belize", "BZ"),
    ("Bolivia", "BO"),
    ("Brazil", "BR"),
    ("Brasil", "BR"),
    ("Canada", "CA"),
    ("Chile", "CL"),
    ("Colombia", "CO"),
    ("Costa Rica", "CR"),
    ("Cuba", "CU"),
    ("Curaçao", "CW"),
    ("Curacao", "CW"),
    ("Dominican Republic", "DO"),
    ("Ecuador", "EC"),
    ("Ecuador, Galápagos", "EC"),
    ("Ecuador, Galapagos", "EC"),
    ("Guatemala", "GT"),
    ("Jamaica", "JM"),
    ("Mexico", "MX"),
    ("México", "MX"),
    ("Panama", "PA"),
    ("Panamá", "PA"),
    ("Peru", "PE"),
    ("Perú", "PE"),
    ("Puerto Rico", "PR"),
    ("Uruguay", "UY"),
    ("United States", "US"),
    ("United States of America", "US"),
    ("USA", "US"),
    ("US", "US"),
    ("United States, Hawaii", "US"),
    ("Hawaii", "US"),
    // Asia and the Middle East
    ("Cambodia", "KH"),
    ("China", "CN"),
    ("Hong Kong", "HK"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Indonesia, Bali", "ID"),
    ("Bali", "ID"),
    ("Israel", "IL"),
    ("Japan", "JP"),
    ("Jordan", "JO"),
    ("Laos", "LA"),
    ("Malaysia", "MY"),
    ("Maldives", "MV"),
    ("Myanmar", "MM"),
    ("Burma", "MM"),
    ("Nepal", "NP"),
    ("Oman", "OM"),
    ("Philippines", "PH"),
    ("Qatar", "QA"),
    ("Saudi Arabia", "SA"),
    ("Singapore", "SG"),
    ("South Korea", "KR"),
    ("Korea, Republic of", "KR"),
    ("Sri Lanka", "LK"),
    ("Ceylon", "LK"),
    ("Taiwan", "TW"),
    ("Thailand", "TH"),
    ("Siam", "TH"),
    ("United Arab Emirates", "AE"),
    ("UAE", "AE"),
    ("Vietnam", "VN"),
    ("Viet Nam", "VN"),
    // Africa
    ("Botswana", "BW"),
    ("Cape Verde", "CV"),
    ("Cabo Verde", "CV"),
    ("Côte d'Ivoire", "CI"),
    ("Cote d'Ivoire", "CI"),
    ("Ivory Coast", "CI"),
    ("Egypt", "EG"),
    ("Eswatini", "SZ"),
    ("Swaziland", "SZ"),
    ("Ghana", "GH"),
    ("Kenya", "KE"),
    ("Madagascar", "MG"),
    ("Mauritius", "MU"),
    ("Morocco", "MA"),
    ("Maroc", "MA"),
    ("Namibia", "NA"),
    ("Réunion", "RE"),
    ("Reunion", "RE"),
    ("Rwanda", "RW"),
    ("Senegal", "SN"),
    ("Sénégal", "SN"),
    ("Seychelles", "SC"),
    ("South Africa", "ZA"),
    ("Tanzania", "TZ"),
    ("Tanzania, Zanzibar", "TZ"),
    ("Zanzibar", "TZ"),
    ("Tunisia", "TN"),
    ("Uganda", "UG"),
    ("Zambia", "ZM"),
    ("Zimbabwe", "ZW"),
    // Oceania
    ("Australia", "AU"),
    ("Fiji", "FJ"),
    ("French Polynesia", "PF"),
    ("New Zealand", "NZ"),
    ("Aotearoa", "NZ"),
];

/// Location page slugs mapped to the country name used in the alias table.
pub(crate) const LOCATION_SLUGS: &[(&str, &str)] = &[
    ("amsterdam", "Netherlands"),
    ("athens", "Greece"),
    ("bali", "Indonesia"),
    ("bangkok", "Thailand"),
    ("barcelona", "Spain"),
    ("berlin", "Germany"),
    ("budapest", "Hungary"),
    ("buenos-aires", "Argentina"),
    ("cancun", "Mexico"),
    ("cape-town", "South Africa"),
    ("copenhagen", "Denmark"),
    ("cusco", "Peru"),
    ("dubai", "United Arab Emirates"),
    ("dublin", "Ireland"),
    ("dubrovnik", "Croatia"),
    ("edinburgh", "United Kingdom"),
    ("florence", "Italy"),
    ("hanoi", "Vietnam"),
    ("havana", "Cuba"),
    ("honolulu", "United States"),
    ("istanbul", "Türkiye"),
    ("kyoto", "Japan"),
    ("lisbon", "Portugal"),
    ("london", "United Kingdom"),
    ("madeira", "Portugal"),
    ("madrid", "Spain"),
    ("mallorca", "Spain"),
    ("marrakech", "Morocco"),
    ("mexico-city", "Mexico"),
    ("miami", "United States"),
    ("milan", "Italy"),
    ("munich", "Germany"),
    ("naples", "Italy"),
    ("new-york", "United States"),
    ("nice", "France"),
    ("oaxaca", "Mexico"),
    ("paris", "France"),
    ("porto", "Portugal"),
    ("prague", "Czechia"),
    ("reykjavik", "Iceland"),
    ("rio-de-janeiro", "Brazil"),
    ("rome", "Italy"),
    ("san-francisco", "United States"),
    ("santorini", "Greece"),
    ("seville", "Spain"),
    ("singapore", "Singapore"),
    ("split", "Croatia"),
    ("sydney", "Australia"),
    ("tenerife", "Spain"),
    ("tokyo", "Japan"),
    ("toronto", "Canada"),
    ("tulum", "Mexico"),
    ("venice", "Italy"),
    ("vienna", "Austria"),
    ("zanzibar", "Tanzania"),
    ("zurich", "Switzerland"),
];
