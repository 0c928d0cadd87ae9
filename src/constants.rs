/// Source identifiers, used as registry keys, provenance tags and metric labels.
pub const MNBA_SOURCE: &str = "mnba";
pub const ANINAT_SOURCE: &str = "aninat";
pub const GALERIA_NAC_SOURCE: &str = "galeria_nac";
pub const PATRICIA_READY_SOURCE: &str = "patricia_ready";
pub const GAM_SOURCE: &str = "gam";
pub const PRECOLOMBINO_SOURCE: &str = "precolombino";

// Sources registered without extraction rules
pub const MUSEO_MEMORIA_SOURCE: &str = "museo_memoria";
pub const TEATRO_MUNICIPAL_SOURCE: &str = "teatro_municipal";
pub const CEAC_SOURCE: &str = "ceac";
pub const SALAS_SCD_SOURCE: &str = "salas_scd";
pub const TEATRO_BIOBIO_SOURCE: &str = "teatro_biobio";
pub const SANTIAGO_CULTURA_SOURCE: &str = "santiago_cultura";
pub const CULTURIZARTE_SOURCE: &str = "culturizarte";
pub const TEATRO_A_MIL_SOURCE: &str = "teatro_a_mil";
pub const CORPARTES_SOURCE: &str = "corpartes";
pub const BAJ_SOURCE: &str = "balmaceda_arte_joven";

/// Provenance tag for events created by hand in the admin.
pub const MANUAL_PROVENANCE: &str = "manual";

// Base URLs
pub const MNBA_BASE_URL: &str = "https://www.mnba.gob.cl";
pub const MNBA_URL: &str = "https://www.mnba.gob.cl/cartelera";
pub const ANINAT_BASE_URL: &str = "https://aninatgaleria.org";
pub const ANINAT_URLS: [&str; 3] = [
    "https://aninatgaleria.org/exhibiciones-2025-aux",
    "https://www.aninatgaleria.org/exhibiciones-2024",
    "https://www.aninatgaleria.org/exhibiciones-2023",
];
pub const GALERIA_NAC_BASE_URL: &str = "https://galerianac.cl";
pub const GALERIA_NAC_URL: &str = "https://galerianac.cl/blogs/exposiciones";
pub const PATRICIA_READY_BASE_URL: &str = "https://galeriapready.cl";
pub const PATRICIA_READY_URL: &str = "https://galeriapready.cl/exhibiciones";
pub const GAM_BASE_URL: &str = "https://gam.cl";
pub const GAM_URL: &str = "https://gam.cl/calendario/";
pub const PRECOLOMBINO_BASE_URL: &str = "https://precolombino.cl";
pub const PRECOLOMBINO_URL: &str = "https://precolombino.cl/wp/exposiciones/";

/// Identification header sent when a source does not ask for anything else.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Webflow-hosted sources reject anything that does not look like desktop Safari/Chrome on macOS.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
