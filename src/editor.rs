//! Authoring of custom games: text fields plus drag-to-draw difference regions.

use log::{debug, info};

use crate::error::{Result, SpotError};
use crate::game_config::{Field, GameConfig, ValidationErrors};
use crate::region::{PercentRect, Point, Region, RenderedBox, LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::store::{CustomConfigStore, KeyValueStore};

/// Drafts must be larger than this in both directions to be kept
pub const MIN_REGION_SIZE: f64 = 20.0;

/// Stable handle for a region while it is being authored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthoredRegion {
    pub id: RegionId,
    pub region: Region,
}

/// The rectangle under the pointer between press and release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftRegion {
    pub anchor: Point,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DraftRegion {
    fn at(anchor: Point) -> Self {
        Self {
            anchor,
            x: anchor.x,
            y: anchor.y,
            width: 0.0,
            height: 0.0,
        }
    }

    fn stretch_to(&mut self, p: Point) {
        self.x = p.x.min(self.anchor.x);
        self.y = p.y.min(self.anchor.y);
        self.width = (p.x - self.anchor.x).abs();
        self.height = (p.y - self.anchor.y).abs();
    }

    pub fn is_big_enough(&self) -> bool {
        self.width > MIN_REGION_SIZE && self.height > MIN_REGION_SIZE
    }

    pub fn percent_rect(&self) -> PercentRect {
        PercentRect::from_logical(self.x, self.y, self.width, self.height)
    }

    /// Snap to whole logical units
    pub fn to_region(&self) -> Region {
        let x = self.x.round() as u32;
        let y = self.y.round() as u32;
        let width = (self.width.round() as u32).min(LOGICAL_WIDTH as u32 - x);
        let height = (self.height.round() as u32).min(LOGICAL_HEIGHT as u32 - y);
        Region::new(x, y, width, height)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    title: String,
    image_a: String,
    image_b: String,
    regions: Vec<AuthoredRegion>,
    next_id: u64,
    editing: bool,
    draft: Option<DraftRegion>,
    errors: ValidationErrors,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an existing game for editing
    pub fn from_config(cfg: &GameConfig) -> Self {
        let mut editor = Self {
            title: cfg.title.clone(),
            image_a: cfg.images.image_a.clone(),
            image_b: cfg.images.image_b.clone(),
            ..Self::default()
        };
        for region in &cfg.regions {
            editor.push_region(*region);
        }
        editor
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::ImageA => &self.image_a,
            Field::ImageB => &self.image_b,
            Field::Regions => "",
        }
    }

    /// Replace a text field and clear its error. `Field::Regions` is not text and is ignored.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::ImageA => &mut self.image_a,
            Field::ImageB => &mut self.image_b,
            Field::Regions => return,
        };
        *slot = value.into();
        self.errors.clear(field);
    }

    pub fn regions(&self) -> &[AuthoredRegion] {
        &self.regions
    }

    pub fn draft(&self) -> Option<&DraftRegion> {
        self.draft.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if !editing {
            self.draft = None;
        }
    }

    pub fn toggle_editing(&mut self) {
        self.set_editing(!self.editing);
    }

    /// Both images are filled in, so there is something to draw on
    pub fn has_images(&self) -> bool {
        !self.image_a.is_empty() && !self.image_b.is_empty()
    }

    fn push_region(&mut self, region: Region) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.push(AuthoredRegion { id, region });
        id
    }

    /// Press: anchor a zero-size draft. Ignored outside editing mode or until both images are set.
    pub fn begin_drag(&mut self, pointer: Point, rendered: &RenderedBox) -> bool {
        if !self.editing || !self.has_images() {
            return false;
        }
        let Some(p) = rendered.normalize(pointer) else {
            return false;
        };
        self.draft = Some(DraftRegion::at(p.clamped()));
        true
    }

    /// Move: the draft spans anchor and pointer, whichever way the drag goes.
    pub fn update_drag(&mut self, pointer: Point, rendered: &RenderedBox) {
        if !self.editing {
            return;
        }
        let (Some(draft), Some(p)) = (self.draft.as_mut(), rendered.normalize(pointer)) else {
            return;
        };
        draft.stretch_to(p.clamped());
    }

    /// Release (or pointer left the image): keep the draft if it is large enough.
    pub fn end_drag(&mut self) -> Option<RegionId> {
        let draft = self.draft.take()?;
        self.errors.clear(Field::Regions);
        if !draft.is_big_enough() {
            debug!(
                "editor: discarding {:.0}x{:.0} draft",
                draft.width, draft.height
            );
            return None;
        }
        let region = draft.to_region();
        let id = self.push_region(region);
        debug!("editor: added region {:?} as {:?}", region, id);
        Some(id)
    }

    /// Remove by position; later regions shift down by one.
    pub fn delete_region(&mut self, index: usize) -> Option<AuthoredRegion> {
        if index >= self.regions.len() {
            return None;
        }
        Some(self.regions.remove(index))
    }

    pub fn delete_region_by_id(&mut self, id: RegionId) -> Option<AuthoredRegion> {
        let index = self.index_of(id)?;
        self.delete_region(index)
    }

    pub fn index_of(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    pub fn to_config(&self) -> GameConfig {
        GameConfig::new(
            self.title.clone(),
            self.image_a.clone(),
            self.image_b.clone(),
            self.regions.iter().map(|r| r.region).collect(),
        )
    }

    /// Run every field check, remembering the errors for display.
    pub fn validate(&mut self) -> std::result::Result<GameConfig, ValidationErrors> {
        let cfg = self.to_config();
        match cfg.validate() {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Ok(cfg)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate and persist; the returned config is ready to be played.
    pub fn commit<S: KeyValueStore>(&mut self, store: &CustomConfigStore<S>) -> Result<GameConfig> {
        let cfg = self.validate().map_err(SpotError::InvalidConfig)?;
        store.save(&cfg)?;
        info!(
            "editor: saved '{}' with {} differences",
            cfg.title,
            cfg.regions.len()
        );
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;

    // rendered at logical size so display and logical coordinates coincide
    fn identity() -> RenderedBox {
        RenderedBox::new(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT)
    }

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> Option<RegionId> {
        editor.begin_drag(from.into(), &identity());
        editor.update_drag(to.into(), &identity());
        editor.end_drag()
    }

    fn filled() -> Editor {
        let mut editor = Editor::new();
        editor.set_field(Field::Title, "Park");
        editor.set_field(Field::ImageA, "https://example.com/a.jpg");
        editor.set_field(Field::ImageB, "https://example.com/b.jpg");
        editor.set_editing(true);
        editor
    }

    #[test]
    fn small_drag_discarded() {
        let mut editor = filled();
        assert_eq!(drag(&mut editor, (50.0, 50.0), (60.0, 55.0)), None);
        assert!(editor.regions().is_empty());
        assert!(editor.draft().is_none());
    }

    #[test]
    fn large_drag_committed() {
        let mut editor = filled();
        assert!(drag(&mut editor, (50.0, 50.0), (200.0, 300.0)).is_some());
        assert_eq!(editor.regions()[0].region, Region::new(50, 50, 150, 250));
        assert!(editor.draft().is_none());
    }

    #[test]
    fn exactly_threshold_is_discarded() {
        let mut editor = filled();
        assert_eq!(drag(&mut editor, (0.0, 0.0), (20.0, 100.0)), None);
        assert!(drag(&mut editor, (0.0, 0.0), (20.5, 100.0)).is_some());
    }

    #[test]
    fn drag_works_in_every_direction() {
        let mut editor = filled();
        drag(&mut editor, (200.0, 200.0), (100.0, 100.0));
        drag(&mut editor, (200.0, 200.0), (300.0, 100.0));
        drag(&mut editor, (200.0, 200.0), (100.0, 300.0));
        let got: Vec<Region> = editor.regions().iter().map(|r| r.region).collect();
        assert_eq!(
            got,
            vec![
                Region::new(100, 100, 100, 100),
                Region::new(200, 100, 100, 100),
                Region::new(100, 200, 100, 100),
            ]
        );
    }

    #[test]
    fn drag_is_normalized_and_rounded() {
        let mut editor = filled();
        let rendered = RenderedBox::new(5.0, 5.0, 60.0, 40.0);
        editor.begin_drag(Point::new(10.04, 10.0), &rendered);
        editor.update_drag(Point::new(20.0, 20.06), &rendered);
        editor.end_drag();
        // (50.4, 50) -> (150, 150.6)
        assert_eq!(editor.regions()[0].region, Region::new(50, 50, 100, 101));
    }

    #[test]
    fn drag_clamped_to_canvas() {
        let mut editor = filled();
        drag(&mut editor, (550.0, 350.0), (900.0, 900.0));
        assert_eq!(editor.regions()[0].region, Region::new(550, 350, 50, 50));
        assert!(editor.regions()[0].region.in_bounds());
    }

    #[test]
    fn drag_ignored_when_not_editing() {
        let mut editor = filled();
        editor.set_editing(false);
        assert!(!editor.begin_drag(Point::new(1.0, 1.0), &identity()));
        assert_eq!(editor.end_drag(), None);
        assert!(editor.regions().is_empty());
    }

    #[test]
    fn drag_ignored_until_both_images_are_set() {
        let mut editor = Editor::new();
        editor.set_editing(true);
        editor.set_field(Field::ImageA, "https://example.com/a.jpg");
        assert!(!editor.begin_drag(Point::new(1.0, 1.0), &identity()));
        editor.update_drag(Point::new(100.0, 100.0), &identity());
        assert_eq!(editor.end_drag(), None);
        assert!(editor.regions().is_empty());

        editor.set_field(Field::ImageB, "https://example.com/b.jpg");
        assert!(drag(&mut editor, (1.0, 1.0), (100.0, 100.0)).is_some());
    }

    #[test]
    fn leaving_editing_mode_drops_draft() {
        let mut editor = filled();
        editor.begin_drag(Point::new(1.0, 1.0), &identity());
        editor.update_drag(Point::new(100.0, 100.0), &identity());
        editor.toggle_editing();
        assert!(editor.draft().is_none());
        assert_eq!(editor.end_drag(), None);
    }

    #[test]
    fn delete_by_index_renumbers() {
        let mut editor = filled();
        let a = drag(&mut editor, (0.0, 0.0), (30.0, 30.0)).unwrap();
        let b = drag(&mut editor, (100.0, 0.0), (130.0, 30.0)).unwrap();
        let c = drag(&mut editor, (200.0, 0.0), (230.0, 30.0)).unwrap();

        let removed = editor.delete_region(1).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(editor.regions().len(), 2);
        assert_eq!(editor.index_of(a), Some(0));
        assert_eq!(editor.index_of(c), Some(1));
        assert_eq!(editor.regions()[1].region, Region::new(200, 0, 30, 30));
        assert!(editor.delete_region(5).is_none());
    }

    #[test]
    fn delete_by_id_survives_renumbering() {
        let mut editor = filled();
        let a = drag(&mut editor, (0.0, 0.0), (30.0, 30.0)).unwrap();
        let b = drag(&mut editor, (100.0, 0.0), (130.0, 30.0)).unwrap();
        editor.delete_region_by_id(a);
        assert_eq!(editor.delete_region_by_id(b).map(|r| r.id), Some(b));
        assert!(editor.regions().is_empty());
        assert!(editor.delete_region_by_id(a).is_none());
    }

    #[test]
    fn ids_never_reused() {
        let mut editor = filled();
        let a = drag(&mut editor, (0.0, 0.0), (30.0, 30.0)).unwrap();
        editor.delete_region(0);
        let b = drag(&mut editor, (0.0, 0.0), (30.0, 30.0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn validate_reports_every_field() {
        let mut editor = Editor::new();
        let errors = editor.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(editor.errors().len(), 4);

        editor.set_field(Field::Title, "x");
        assert_eq!(editor.errors().get(Field::Title), None);
        assert_eq!(editor.errors().len(), 3);
    }

    #[test]
    fn drag_release_clears_regions_error() {
        let mut editor = filled();
        editor.validate().unwrap_err();
        assert!(editor.errors().get(Field::Regions).is_some());
        drag(&mut editor, (0.0, 0.0), (5.0, 5.0));
        assert!(editor.errors().get(Field::Regions).is_none());
    }

    #[test]
    fn commit_persists_and_returns_config() {
        let mut editor = filled();
        drag(&mut editor, (50.0, 50.0), (200.0, 300.0));
        let store = CustomConfigStore::new(MemoryStore::new());
        let cfg = editor.commit(&store).unwrap();
        assert_eq!(cfg.title, "Park");
        assert_eq!(cfg.regions, vec![Region::new(50, 50, 150, 250)]);
        assert_eq!(store.load(), Some(cfg));
    }

    #[test]
    fn failed_commit_persists_nothing() {
        let mut editor = filled();
        let store = CustomConfigStore::new(MemoryStore::new());
        assert_matches!(editor.commit(&store), Err(SpotError::InvalidConfig(e)) if e.len() == 1);
        assert_eq!(store.load(), None);
        assert!(editor.errors().get(Field::Regions).is_some());
    }

    #[test]
    fn from_config_roundtrips() {
        let cfg = GameConfig::new(
            "Old",
            "a",
            "b",
            vec![Region::new(1, 2, 30, 40), Region::new(5, 6, 70, 80)],
        );
        let editor = Editor::from_config(&cfg);
        assert_eq!(editor.field(Field::Title), "Old");
        assert_eq!(editor.to_config(), cfg);
        assert!(!editor.is_editing());
    }
}
