//! Localized UI strings.
//!
//! The language set and the key set are both closed enums, so a missing
//! translation is a compile-time hole in a `match` rather than a runtime
//! typo. Lookup falls back to English, then to the key's own name.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Es, Language::Fr, Language::De];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            "fr" => Some(Language::Fr),
            "de" => Some(Language::De),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Every string the UI can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Title,
    Convert,
    Favorites,
    News,
    RatesUpdated,
    RateError,
    OfflineRates,
    NewsError,
    FallbackNews1Title,
    FallbackNews1Desc,
    FallbackNews2Title,
    FallbackNews2Desc,
    NoChartData,
    Languages,
}

impl Text {
    /// The raw key name, used as the last-resort fallback.
    pub fn name(self) -> &'static str {
        match self {
            Text::Title => "title",
            Text::Convert => "convert",
            Text::Favorites => "favorites",
            Text::News => "news",
            Text::RatesUpdated => "ratesUpdated",
            Text::RateError => "rateError",
            Text::OfflineRates => "offlineRates",
            Text::NewsError => "newsError",
            Text::FallbackNews1Title => "fallbackNews1Title",
            Text::FallbackNews1Desc => "fallbackNews1Desc",
            Text::FallbackNews2Title => "fallbackNews2Title",
            Text::FallbackNews2Desc => "fallbackNews2Desc",
            Text::NoChartData => "noChartData",
            Text::Languages => "languages",
        }
    }

    pub const ALL: [Text; 14] = [
        Text::Title,
        Text::Convert,
        Text::Favorites,
        Text::News,
        Text::RatesUpdated,
        Text::RateError,
        Text::OfflineRates,
        Text::NewsError,
        Text::FallbackNews1Title,
        Text::FallbackNews1Desc,
        Text::FallbackNews2Title,
        Text::FallbackNews2Desc,
        Text::NoChartData,
        Text::Languages,
    ];
}

/// Looks up `key` for `language`, falling back to English and finally to the
/// raw key name when no translation exists.
pub fn lookup(language: Language, key: Text) -> &'static str {
    translation(language, key)
        .or_else(|| translation(Language::En, key))
        .unwrap_or_else(|| key.name())
}

fn translation(language: Language, key: Text) -> Option<&'static str> {
    use Language::*;
    use Text::*;

    Some(match (language, key) {
        (En, Title) => "Currency Converter Pro",
        (En, Convert) => "Convert",
        (En, Favorites) => "Favorite Currencies",
        (En, News) => "Currency News",
        (En, RatesUpdated) => "Rates updated",
        (En, RateError) => "Failed to load exchange rates. Using offline data.",
        (En, OfflineRates) => "Using offline exchange rates",
        (En, NewsError) => "Failed to load news",
        (En, FallbackNews1Title) => "Global Currency Markets Update",
        (En, FallbackNews1Desc) => "Major currencies show stability amid economic recovery",
        (En, FallbackNews2Title) => "Digital Currency Trends",
        (En, FallbackNews2Desc) => "Cryptocurrencies gaining traction in traditional markets",
        (En, NoChartData) => "No historical data available",
        (En, Languages) => "Supported languages",

        (Es, Title) => "Convertidor de Moneda Pro",
        (Es, Convert) => "Convertir",
        (Es, Favorites) => "Monedas Favoritas",
        (Es, News) => "Noticias de Divisas",
        (Es, RatesUpdated) => "Tasas actualizadas",
        (Es, RateError) => "Error al cargar tasas. Usando datos offline.",
        (Es, OfflineRates) => "Usando tasas de cambio offline",
        (Es, NewsError) => "Error al cargar noticias",
        (Es, FallbackNews1Title) => "Actualización de Mercados Globales",
        (Es, FallbackNews1Desc) => {
            "Las principales monedas muestran estabilidad durante la recuperación económica"
        }
        (Es, FallbackNews2Title) => "Tendencias de Monedas Digitales",
        (Es, FallbackNews2Desc) => {
            "Las criptomonedas ganan terreno en los mercados tradicionales"
        }
        (Es, NoChartData) => "No hay datos históricos disponibles",

        (Fr, Title) => "Convertisseur de Devises Pro",
        (Fr, Convert) => "Convertir",
        (Fr, Favorites) => "Devises Favorites",
        (Fr, News) => "Actualités des Devises",
        (Fr, RatesUpdated) => "Taux mis à jour",
        (Fr, RateError) => {
            "Échec du chargement des taux. Utilisation des données hors ligne."
        }
        (Fr, OfflineRates) => "Utilisation des taux de change hors ligne",
        (Fr, NewsError) => "Échec du chargement des actualités",
        (Fr, FallbackNews1Title) => "Mise à jour des Marchés Mondiaux",
        (Fr, FallbackNews1Desc) => {
            "Les principales devises montrent une stabilité pendant la reprise économique"
        }
        (Fr, FallbackNews2Title) => "Tendances des Devises Numériques",
        (Fr, FallbackNews2Desc) => {
            "Les cryptomonnaies gagnent du terrain sur les marchés traditionnels"
        }

        (De, Title) => "Währungsrechner Pro",
        (De, Convert) => "Konvertieren",
        (De, Favorites) => "Favoriten Währungen",
        (De, News) => "Währungsnachrichten",
        (De, RatesUpdated) => "Wechselkurse aktualisiert",
        (De, RateError) => {
            "Fehler beim Laden der Wechselkurse. Offline-Daten werden verwendet."
        }
        (De, OfflineRates) => "Offline-Wechselkurse werden verwendet",
        (De, NewsError) => "Fehler beim Laden der Nachrichten",
        (De, FallbackNews1Title) => "Update der globalen Währungsmärkte",
        (De, FallbackNews1Desc) => {
            "Hauptwährungen zeigen Stabilität in der wirtschaftlichen Erholung"
        }
        (De, FallbackNews2Title) => "Trends bei digitalen Währungen",
        (De, FallbackNews2Desc) => {
            "Kryptowährungen gewinnen an Bedeutung in traditionellen Märkten"
        }

        _ => return None,
    })
}
