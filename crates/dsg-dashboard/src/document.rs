//! One dashboard session: current controls plus the sources bound to them.
//!
//! A control change recomputes every view from the immutable dataset and
//! replaces all three sources at once. An invalid change leaves the document
//! as it was.

use std::sync::Arc;

use dsg_core::{ControlChange, Controls, Dataset, Views};
use tracing::debug;

use crate::error::Result;
use crate::sources::BoundSources;

pub struct Document {
    dataset: Arc<Dataset>,
    controls: Controls,
    sources: BoundSources,
    /// Bumped on every replacement; the initial load is revision 0.
    revision: u64,
}

impl Document {
    /// Create a document and run the initial load for `controls`.
    pub fn new(dataset: Arc<Dataset>, controls: Controls) -> Result<Self> {
        let views = Views::derive(&dataset, &controls)?;
        Ok(Self {
            dataset,
            controls,
            sources: BoundSources::from(&views),
            revision: 0,
        })
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn sources(&self) -> &BoundSources {
        &self.sources
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply one widget change and replace the bound sources.
    pub fn apply(&mut self, change: &ControlChange) -> Result<&BoundSources> {
        let controls = self.controls.with_change(change)?;
        let views = Views::derive(&self.dataset, &controls)?;

        self.sources = BoundSources::from(&views);
        self.controls = controls;
        self.revision += 1;
        debug!(revision = self.revision, ?change, "sources replaced");

        Ok(&self.sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use dsg_core::{DsgError, StationFilter};
    use dsg_io::read_dataset;

    const CSV: &str = "Name,Date,lat,lon,Obs_pop(MW_m2_pop),Pred_pop(MW_m2_pop)\n\
        Auckland,2018-01-01 12:00:00,-36.85,174.76,100,90\n\
        Wellington,2018-01-01 12:00:00,-41.28,174.77,50,60\n\
        Auckland,2018-01-01 12:10:00,-36.85,174.76,200,180\n\
        Wellington,2018-01-01 12:10:00,-41.28,174.77,80,70\n";

    fn document() -> Document {
        let ds = Arc::new(read_dataset(CSV.as_bytes()).unwrap());
        Document::new(ds, Controls::default()).unwrap()
    }

    #[test]
    fn initial_load_matches_pure_derivation() {
        let doc = document();
        let expected = Views::derive(doc.dataset(), &Controls::default()).unwrap();
        assert_eq!(doc.sources(), &BoundSources::from(&expected));
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn change_replaces_all_sources() {
        let mut doc = document();
        let before = doc.sources().clone();

        doc.apply(&ControlChange::Surface(2.0)).unwrap();
        let after = doc.sources();

        for (a, b) in before.instant.obs.iter().zip(&after.instant.obs) {
            assert!((b - 2.0 * a).abs() < 1e-12);
        }
        for (a, b) in before.cumulative.cum_pred.iter().zip(&after.cumulative.cum_pred) {
            assert!((b - 2.0 * a).abs() < 1e-12);
        }
        for (a, b) in before.map.obs.iter().zip(&after.map.obs) {
            assert!((b - 2.0 * a).abs() < 1e-12);
        }
        assert_eq!(doc.revision(), 1);
    }

    #[test]
    fn sources_depend_only_on_current_controls() {
        let mut doc = document();
        doc.apply(&ControlChange::Station("Wellington".into())).unwrap();
        doc.apply(&ControlChange::Efficiency(0.9)).unwrap();
        doc.apply(&ControlChange::Station(StationFilter::All)).unwrap();

        let fresh = Document::new(doc.dataset().clone(), doc.controls().clone()).unwrap();
        assert_eq!(doc.sources(), fresh.sources());
    }

    #[test]
    fn rejected_change_keeps_previous_state() {
        let mut doc = document();
        let before = doc.sources().clone();

        let err = doc
            .apply(&ControlChange::Station("Dunedin".into()))
            .unwrap_err();
        assert!(matches!(err, Error::Core(DsgError::UnknownStation(_))));
        assert!(doc.apply(&ControlChange::Efficiency(4.0)).is_err());

        assert_eq!(doc.sources(), &before);
        assert!(doc.controls().station.is_all());
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn revision_counts_accepted_changes_only() {
        let mut doc = document();
        doc.apply(&ControlChange::Efficiency(1.0)).unwrap();
        assert!(doc.apply(&ControlChange::Surface(-1.0)).is_err());
        doc.apply(&ControlChange::Station("Auckland".into())).unwrap();

        assert_eq!(doc.revision(), 2);
        assert_eq!(doc.controls().efficiency, 1.0);
        assert_eq!(doc.controls().surface, 1.0);
    }
}
