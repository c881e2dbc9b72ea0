use crate::animation::AnimationScheduler;
use crate::error::SeqViewError;
use crate::options::LayoutOptions;
use crate::scene::{PrimitiveId, PrimitiveSet, Surface, Visibility};

/// Residue ruler drawn above the tracks: a baseline, a tick and number
/// every ten residues, and one letter per residue that only shows when
/// zoomed in far enough to read.
#[derive(Debug, Clone)]
pub struct ResidueAxis {
    group: PrimitiveId,
    letters: PrimitiveSet,
    length: usize,
}

impl ResidueAxis {
    /// Draw the axis for `sequence` under `parent`.
    pub fn build(
        surface: &mut Surface,
        parent: PrimitiveId,
        sequence: &[char],
        options: &LayoutOptions,
    ) -> Self {
        let group = surface.group();
        let _ = surface.push(parent, group);
        let len = sequence.len() as f64;
        let base = options.axis_height - 2.0;

        let line = surface.path(format!("M 0 {base} L {len} {base}"));
        let _ = surface.push(group, line);

        for decade in (10..=sequence.len()).step_by(10) {
            let x = decade as f64 - 0.5;
            let tick = surface.path(format!("M {x} {} L {x} {base}", base - 2.0));
            let number = surface.text(x, base - 3.0, decade.to_string());
            let _ = surface.push(group, tick);
            let _ = surface.push(group, number);
        }

        let mut letters = PrimitiveSet::new();
        for (i, residue) in sequence.iter().enumerate() {
            let letter = surface.text(i as f64, base - 6.0, residue.to_string());
            let _ = surface.push(group, letter);
            letters.push(letter);
        }

        Self {
            group,
            letters,
            length: sequence.len(),
        }
    }

    /// Number of residues on the axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the axis has no residues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Per-residue letters.
    #[must_use]
    pub fn letters(&self) -> &PrimitiveSet {
        &self.letters
    }

    /// Show residue letters at or above `threshold`, hide them below.
    pub fn update_for_zoom(
        &self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
        zoom: f64,
        threshold: f64,
    ) -> Result<(), SeqViewError> {
        let want = if zoom >= threshold {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        if self.letters.visibility(surface) == want {
            return Ok(());
        }
        match want {
            Visibility::Visible => self.letters.show(surface, scheduler),
            Visibility::Hidden => self.letters.hide(surface, scheduler),
        }
    }

    /// Remove every axis primitive.
    pub fn remove(&mut self, surface: &mut Surface, scheduler: &mut AnimationScheduler) {
        self.letters.remove_from(surface, scheduler);
        surface.remove(self.group);
        self.length = 0;
    }
}
