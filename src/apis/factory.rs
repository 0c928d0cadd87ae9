use super::aninat::AninatExtractor;
use super::galeria_nac::GaleriaNacExtractor;
use super::gam::GamExtractor;
use super::mnba::MnbaExtractor;
use super::patricia_ready::PatriciaReadyExtractor;
use super::pending::PendingSource;
use super::precolombino::PrecolombinoExtractor;
use crate::config::CollectorConfig;
use crate::constants::*;
use crate::fetcher::Fetcher;
use crate::types::Extractor;
use std::sync::Arc;
use tracing::warn;

static PENDING_SOURCES: [(&str, &str); 10] = [
    (MUSEO_MEMORIA_SOURCE, "https://mmdh.cl/cartelera"),
    (TEATRO_MUNICIPAL_SOURCE, "https://www.municipal.cl/cartelera/"),
    (CEAC_SOURCE, "https://ceacuchile.cl/cartelera/"),
    (SALAS_SCD_SOURCE, "https://www.salascd.cl/cartelera/"),
    (TEATRO_BIOBIO_SOURCE, "https://teatrobiobio.cl/cartelera/"),
    (SANTIAGO_CULTURA_SOURCE, "https://www.santiagocultura.cl/agenda/"),
    (CULTURIZARTE_SOURCE, "https://culturizarte.cl/category/panoramas/"),
    (TEATRO_A_MIL_SOURCE, "https://teatroamil.cl/cartelera/"),
    (CORPARTES_SOURCE, "https://www.corpartes.cl/cartelera/"),
    (BAJ_SOURCE, "https://www.balmacedartejoven.cl/agenda/"),
];

/// All known source ids, in registry order.
pub fn supported_sources() -> Vec<&'static str> {
    let mut ids = vec![
        MNBA_SOURCE,
        ANINAT_SOURCE,
        GALERIA_NAC_SOURCE,
        PATRICIA_READY_SOURCE,
        GAM_SOURCE,
        PRECOLOMBINO_SOURCE,
    ];
    ids.extend(PENDING_SOURCES.iter().map(|(id, _)| *id));
    ids
}

/// Create the extractor registered under `source_id`.
pub fn create_extractor(source_id: &str, fetcher: &Fetcher) -> Option<Arc<dyn Extractor>> {
    let extractor: Arc<dyn Extractor> = match source_id {
        MNBA_SOURCE => Arc::new(MnbaExtractor::new(fetcher.clone())),
        ANINAT_SOURCE => Arc::new(AninatExtractor::new(fetcher.clone())),
        GALERIA_NAC_SOURCE => Arc::new(GaleriaNacExtractor::new(fetcher.clone())),
        PATRICIA_READY_SOURCE => Arc::new(PatriciaReadyExtractor::new(fetcher.clone())),
        GAM_SOURCE => Arc::new(GamExtractor::new(fetcher.clone())),
        PRECOLOMBINO_SOURCE => Arc::new(PrecolombinoExtractor::new(fetcher.clone())),
        other => {
            let (id, url) = PENDING_SOURCES.iter().copied().find(|(id, _)| *id == other)?;
            Arc::new(PendingSource::new(id, url))
        }
    };
    Some(extractor)
}

/// Build the ordered registry for one run.
///
/// `only` restricts the run to the named sources (unknown names are logged
/// and ignored); sources disabled in the config are always left out.
pub fn build_registry(
    fetcher: &Fetcher,
    config: &CollectorConfig,
    only: Option<&[String]>,
) -> Vec<Arc<dyn Extractor>> {
    if let Some(names) = only {
        for name in names {
            if !supported_sources().contains(&name.as_str()) {
                warn!("Unknown source specified: {}", name);
            }
        }
    }

    supported_sources()
        .into_iter()
        .filter(|id| only.map_or(true, |names| names.iter().any(|n| n.as_str() == *id)))
        .filter(|id| !config.disabled_sources.iter().any(|d| d.as_str() == *id))
        .filter_map(|id| create_extractor(id, fetcher))
        .collect()
}
