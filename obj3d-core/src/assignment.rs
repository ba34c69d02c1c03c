//! Which material each triangle uses
//!
//! `usemtl` applies from the current triangle ordinal until the next
//! `usemtl`. Rather than stamping every triangle, the tracker keeps sorted
//! breakpoints and resolves an ordinal by binary search.
use std::collections::BTreeMap;

/// Material `material` applies from triangle `ordinal` onwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub ordinal: usize,
    pub material: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialAssignment {
    breakpoints: Vec<Breakpoint>,
    usage: BTreeMap<String, usize>,
    sealed: bool,
}

impl MaterialAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start using `material` at triangle `ordinal`.
    ///
    /// Ordinals must not decrease. A second `usemtl` at the same ordinal
    /// overwrites the first.
    pub fn begin(&mut self, ordinal: usize, material: &str) {
        debug_assert!(!self.sealed, "assignment already sealed");
        debug_assert!(self.breakpoints.last().map_or(true, |b| b.ordinal <= ordinal));

        if let Some(last) = self.breakpoints.last() {
            if last.ordinal == ordinal {
                tracing::warn!(
                    "Triangle {} changed to use material {} (was {})",
                    ordinal,
                    material,
                    last.material
                );
                self.breakpoints.pop();
            } else {
                self.credit_last(ordinal);
            }
        }

        self.usage.entry(material.to_string()).or_insert(0);
        self.breakpoints.push(Breakpoint {
            ordinal,
            material: material.to_string(),
        });
    }

    /// Close the last interval at `total_triangles` so usage counts are final
    pub fn seal(&mut self, total_triangles: usize) {
        if !self.sealed {
            self.credit_last(total_triangles);
            self.sealed = true;
        }
    }

    fn credit_last(&mut self, end: usize) {
        if let Some(last) = self.breakpoints.last() {
            let covered = end.saturating_sub(last.ordinal);
            *self.usage.entry(last.material.clone()).or_insert(0) += covered;
        }
    }

    /// Material in effect for triangle `ordinal`, if any `usemtl` precedes it
    pub fn material_for(&self, ordinal: usize) -> Option<&str> {
        let after = self.breakpoints.partition_point(|b| b.ordinal <= ordinal);
        after
            .checked_sub(1)
            .map(|at| self.breakpoints[at].material.as_str())
    }

    /// Number of triangles attributed to `material`. Final once sealed.
    pub fn usage(&self, material: &str) -> usize {
        self.usage.get(material).copied().unwrap_or(0)
    }

    /// Materials covering at least one triangle with their counts, sorted
    /// by name. A `usemtl` overwritten before any face is not listed.
    pub fn used_materials(&self) -> impl Iterator<Item = (&str, usize)> {
        self.usage
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(name, &count)| (name.as_str(), count))
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }
}
