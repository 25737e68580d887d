//! `analysis.navigation`: regions that point at targets through two
//! message-level tables.
//!
//! `NavigationTarget::file_index` indexes `files`, and every entry of
//! `NavigationRegion::targets` indexes `targets`. Both are checked while the
//! message is decoded.

use crate::element::ElementKind;
use aswire_core::{protocol_object, table, Cursor, DecodeConfig, Interner, Result};

protocol_object! {
    /// A region of the source that navigates to one or more targets.
    #[derive(Eq, Hash)]
    pub struct NavigationRegion {
        required offset: i64 = "offset",
        required length: i64 = "length",
        /// Indices into the enclosing message's `targets`.
        required targets: Vec<i64> = "targets",
    }
}

protocol_object! {
    /// A navigation target. The file is stored by index into the enclosing
    /// message's `files`.
    #[derive(Eq, Hash)]
    pub struct NavigationTarget {
        required kind: ElementKind = "kind",
        required file_index: i64 = "fileIndex",
        required offset: i64 = "offset",
        required length: i64 = "length",
        required start_line: i64 = "startLine",
        required start_column: i64 = "startColumn",
        optional code_offset: i64 = "codeOffset",
        optional code_length: i64 = "codeLength",
    }
}

protocol_object! {
    /// Params of the `analysis.navigation` notification.
    #[derive(Eq, Hash)]
    pub struct AnalysisNavigationParams {
        required file: String = "file",
        required regions: Vec<NavigationRegion> = "regions",
        required targets: Vec<NavigationTarget> = "targets",
        required files: Vec<String> = "files",
    }
    validate = check_navigation;
}

fn check_navigation(params: &AnalysisNavigationParams, cx: &Cursor<'_>) -> Result<()> {
    let targets_cx = cx.field("targets");
    for (i, target) in params.targets.iter().enumerate() {
        let target_cx = targets_cx.index(i);
        table::lookup(
            &params.files,
            target.file_index,
            "files",
            &target_cx.field("fileIndex"),
        )?;
    }

    let regions_cx = cx.field("regions");
    for (i, region) in params.regions.iter().enumerate() {
        let region_cx = regions_cx.index(i);
        table::check_indices(
            params.targets.len(),
            &region.targets,
            "targets",
            &region_cx.field("targets"),
        )?;
    }
    Ok(())
}

/// A target bound to its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedTarget<'a> {
    pub file: &'a str,
    pub target: &'a NavigationTarget,
}

/// A region with its target indices bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRegion<'a> {
    pub offset: i64,
    pub length: i64,
    pub targets: Vec<ResolvedTarget<'a>>,
}

/// `AnalysisNavigationParams` with every index bound to its table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedNavigation<'a> {
    pub file: &'a str,
    pub regions: Vec<ResolvedRegion<'a>>,
}

impl AnalysisNavigationParams {
    /// Bind all indices. Pure and repeatable; fails only if the tables were
    /// edited after decoding into an inconsistent state.
    pub fn resolve(&self) -> Result<ResolvedNavigation<'_>> {
        let config = DecodeConfig::default();
        let cx = Cursor::root("AnalysisNavigationParams", &config);
        let regions_cx = cx.field("regions");
        let targets_cx = cx.field("targets");

        let regions = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, region)| self.resolve_region(region, &regions_cx.index(i), &targets_cx))
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedNavigation {
            file: &self.file,
            regions,
        })
    }

    fn resolve_region<'a>(
        &'a self,
        region: &'a NavigationRegion,
        cx: &Cursor<'_>,
        targets_cx: &Cursor<'_>,
    ) -> Result<ResolvedRegion<'a>> {
        let indices_cx = cx.field("targets");
        let targets = region
            .targets
            .iter()
            .enumerate()
            .map(|(i, &index)| {
                let at = indices_cx.index(i);
                let k = table::position(self.targets.len(), index, "targets", &at)?;
                self.resolve_target(&self.targets[k], &targets_cx.index(k))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedRegion {
            offset: region.offset,
            length: region.length,
            targets,
        })
    }

    fn resolve_target<'a>(
        &'a self,
        target: &'a NavigationTarget,
        cx: &Cursor<'_>,
    ) -> Result<ResolvedTarget<'a>> {
        let file = table::lookup(&self.files, target.file_index, "files", &cx.field("fileIndex"))?;
        Ok(ResolvedTarget { file, target })
    }

    /// Rebuild the flat form of a resolved navigation.
    #[must_use]
    pub fn from_resolved(resolved: &ResolvedNavigation<'_>) -> Self {
        let mut builder = NavigationBuilder::new(resolved.file);
        for region in &resolved.regions {
            builder.add_region(region.offset, region.length, &region.targets);
        }
        builder.build()
    }
}

/// Builds `AnalysisNavigationParams` from live targets, interning files and
/// targets in first-occurrence order.
#[derive(Debug, Clone)]
pub struct NavigationBuilder {
    file: String,
    files: Interner<String>,
    targets: Interner<NavigationTarget>,
    regions: Vec<NavigationRegion>,
}

impl NavigationBuilder {
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            files: Interner::new(),
            targets: Interner::new(),
            regions: Vec::new(),
        }
    }

    /// Add a region. The `file_index` of each given target is ignored and
    /// replaced by the index of its `file` in the rebuilt table.
    pub fn add_region(&mut self, offset: i64, length: i64, targets: &[ResolvedTarget<'_>]) {
        let indices = targets
            .iter()
            .map(|resolved| {
                let mut target = resolved.target.clone();
                target.file_index = self.files.intern(&resolved.file.to_string());
                self.targets.intern(&target)
            })
            .collect();
        self.regions.push(NavigationRegion {
            offset,
            length,
            targets: indices,
        });
    }

    #[must_use]
    pub fn build(self) -> AnalysisNavigationParams {
        AnalysisNavigationParams {
            file: self.file,
            regions: self.regions,
            targets: self.targets.into_entries(),
            files: self.files.into_entries(),
        }
    }
}
