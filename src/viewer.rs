//! Viewer context
//!
//! [`DistributionViewer`] owns everything a viewing session needs: both
//! sample stores, the sampler, the current settings, the last histogram
//! snapshot and the match session cursor. Callers drive it explicitly:
//!
//! ```no_run
//! use distview::config::ViewerConfig;
//! use distview::viewer::DistributionViewer;
//!
//! let mut viewer = DistributionViewer::new(ViewerConfig::default())?;
//! viewer.load()?;
//! let snapshot = viewer.refresh_histograms()?;
//! println!("{} model histograms", snapshot.model.len());
//!
//! viewer.start_match();
//! while let Some(group) = viewer.match_next_group() {
//!     println!("group {}: {:?}", group.group, group.outcome);
//! }
//! # Ok::<(), distview::error::AnalysisError>(())
//! ```
//!
//! Every setter validates before it changes anything, and a failed load or
//! refresh leaves the previous stores and snapshot in place.

use crate::classifier::{classify, ClassificationResult, MatchCursor};
use crate::config::ViewerConfig;
use crate::error::{AnalysisError, DegenerateStage, Result};
use crate::histogram::{self, Histogram};
use crate::percentile;
use crate::sample_store::{DelayType, Group, SampleStore};
use crate::sampler::{self, Sampler};
use std::path::PathBuf;

/// Histograms from one refresh, one per sample set
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// Number of buckets every histogram in the snapshot has
    pub domain_bound: usize,
    /// Whether `domain_bound` came from percentile clipping
    pub clipped: bool,
    pub model: Vec<Histogram>,
    pub data: Vec<Histogram>,
}

impl HistogramSnapshot {
    /// Histograms of one side
    pub fn group(&self, group: Group) -> &[Histogram] {
        match group {
            Group::Model => &self.model,
            Group::Data => &self.data,
        }
    }
}

/// Outcome of matching one model group against data group 0
#[derive(Debug)]
pub struct GroupMatch {
    /// Model group index, 0-based
    pub group: usize,
    /// Source file of the model group
    pub source: PathBuf,
    pub outcome: Result<ClassificationResult>,
}

/// Session context replacing process-wide viewer state
#[derive(Debug)]
pub struct DistributionViewer {
    config: ViewerConfig,
    delay_type: DelayType,
    model: SampleStore,
    data: SampleStore,
    sampler: Sampler,
    snapshot: Option<HistogramSnapshot>,
    cursor: Option<MatchCursor>,
}

impl DistributionViewer {
    /// Build a viewer from a validated configuration; no files are read yet
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate().map_err(AnalysisError::InvalidConfig)?;
        let delay_type = DelayType::from_selector(config.delay_type)?;

        let sampler = match config.seed {
            Some(seed) => Sampler::seeded(seed),
            None => Sampler::new(),
        };

        Ok(Self {
            model: SampleStore::empty(Group::Model, config.model_pattern.clone(), delay_type),
            data: SampleStore::empty(Group::Data, config.data_pattern.clone(), delay_type),
            delay_type,
            sampler,
            snapshot: None,
            cursor: None,
            config,
        })
    }

    /// (Re)load both groups with the current delay type
    ///
    /// Both stores are replaced only when both patterns load.
    pub fn load(&mut self) -> Result<()> {
        let model = SampleStore::load(Group::Model, &self.config.model_pattern, self.delay_type)?;
        let data = SampleStore::load(Group::Data, &self.config.data_pattern, self.delay_type)?;

        tracing::debug!(
            "Loaded {} model sets ({} samples) and {} data sets ({} samples) with {}",
            model.sets().len(),
            model.total_samples(),
            data.sets().len(),
            data.total_samples(),
            self.delay_type
        );

        self.model = model;
        self.data = data;
        Ok(())
    }

    /// Switch the delay type and reload both groups
    pub fn set_delay_type(&mut self, selector: usize) -> Result<()> {
        let delay_type = DelayType::from_selector(selector)?;
        let previous = self.delay_type;

        self.delay_type = delay_type;
        if let Err(e) = self.load() {
            self.delay_type = previous;
            return Err(e);
        }

        self.config.delay_type = selector;
        Ok(())
    }

    /// Change the subsampling rate (percent, in `(0, 100]`)
    pub fn set_sample_rate(&mut self, rate_percent: f64) -> Result<()> {
        sampler::draw_size(0, rate_percent)?;
        self.config.sample_rate = rate_percent;
        Ok(())
    }

    /// Turn percentile clipping of the histogram domain on or off
    pub fn set_clip(&mut self, clip: bool) {
        self.config.clip_percentile = clip;
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn delay_type(&self) -> DelayType {
        self.delay_type
    }

    pub fn store(&self, group: Group) -> &SampleStore {
        match group {
            Group::Model => &self.model,
            Group::Data => &self.data,
        }
    }

    /// Last successful refresh, if any
    pub fn snapshot(&self) -> Option<&HistogramSnapshot> {
        self.snapshot.as_ref()
    }

    /// Subsample every set, pick the domain and bin
    ///
    /// With clipping on, the domain is the 99.9th-percentile bucket of all
    /// subsamples pooled together, kept inside the configured domain bound.
    pub fn refresh_histograms(&mut self) -> Result<HistogramSnapshot> {
        let rate = self.config.sample_rate;

        let model = self.subsample_store(Group::Model, rate)?;
        let data = self.subsample_store(Group::Data, rate)?;

        let domain_bound = if self.config.clip_percentile {
            let pooled: Vec<u64> = model.iter().chain(data.iter()).flatten().copied().collect();
            percentile::clip_bound(&pooled, self.config.domain_bound)?
        } else {
            self.config.domain_bound
        };

        let snapshot = HistogramSnapshot {
            domain_bound,
            clipped: self.config.clip_percentile,
            model: model
                .iter()
                .map(|s| histogram::bin(s, domain_bound))
                .collect(),
            data: data.iter().map(|s| histogram::bin(s, domain_bound)).collect(),
        };

        tracing::debug!(
            "Refreshed {} model and {} data histograms over {} buckets (rate {}%)",
            snapshot.model.len(),
            snapshot.data.len(),
            domain_bound,
            rate
        );

        self.snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn subsample_store(&mut self, group: Group, rate: f64) -> Result<Vec<Vec<u64>>> {
        let store = match group {
            Group::Model => &self.model,
            Group::Data => &self.data,
        };
        store
            .sets()
            .iter()
            .map(|set| self.sampler.subsample(set.samples(), rate))
            .collect()
    }

    /// Begin a match session over the first (up to three) model groups
    ///
    /// Without any data group there is nothing to match against and the
    /// session is empty. Returns the number of groups in the session.
    pub fn start_match(&mut self) -> usize {
        let groups = if self.data.sets().is_empty() {
            0
        } else {
            self.model.sets().len()
        };

        let cursor = MatchCursor::new(groups);
        let (_, total) = cursor.progress();
        tracing::debug!("Match session started over {} model groups", total);

        self.cursor = Some(cursor);
        total
    }

    pub fn is_matching(&self) -> bool {
        self.cursor.is_some()
    }

    /// `(groups matched, groups in session)` of the active session
    pub fn match_progress(&self) -> Option<(usize, usize)> {
        self.cursor.as_ref().map(MatchCursor::progress)
    }

    /// Match the next model group against data group 0
    ///
    /// Returns `None` when no session is active, or when the session has run
    /// out of groups; the session is then closed. A reload that drops the
    /// next model group also ends the session. A group whose classification
    /// fails is still returned so the session continues.
    pub fn match_next_group(&mut self) -> Option<GroupMatch> {
        let next = self.cursor.as_mut()?.advance();

        let current = next.and_then(|group| self.model.get(group).map(|set| (group, set)));
        let Some((group, model_set)) = current else {
            tracing::debug!("Match session finished");
            self.cursor = None;
            return None;
        };

        let rate = self.config.sample_rate;
        let source = model_set.source().to_path_buf();

        let outcome = match self.data.get(0) {
            Some(data_set) => self
                .sampler
                .subsample(model_set.samples(), rate)
                .and_then(|model| {
                    let data = self.sampler.subsample(data_set.samples(), rate)?;
                    classify(&model, &data, &self.config.classifier)
                }),
            None => Err(AnalysisError::DegenerateDataSet {
                stage: DegenerateStage::Trim,
            }),
        };

        match &outcome {
            Ok(result) => tracing::debug!(
                "Group {} ({}): sens={:.4} spec={:.4}",
                group,
                source.display(),
                result.sensitivity,
                result.specificity
            ),
            Err(e) => tracing::warn!("Group {} ({}): {}", group, source.display(), e),
        }

        Some(GroupMatch {
            group,
            source,
            outcome,
        })
    }
}
