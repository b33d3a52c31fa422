//! Lesson catalog.
//!
//! The [`Gallery`] owns one instance of every demo, grouped by lesson, and
//! keeps at most one of them mounted: selecting a demo unmounts the current
//! one (tearing its stage down) before mounting the next.

use crate::demos::{
    BlackScreenDemo, CanvasTextDemo, CoordinateDemo, CurveDemo, Demo, DoubleSideDemo,
    DrawingDemo, LineTypesDemo, MaterialDemo, OverlayDemo, ShapeDemo, VoxelTextDemo,
};
use crate::stage::Surface;

pub struct Lesson {
    /// Lesson number as shown to the user, starting at 1.
    pub number: usize,
    pub title: &'static str,
    pub demos: Vec<Box<dyn Demo>>,
}

pub struct Gallery {
    lessons: Vec<Lesson>,
    lesson: usize,
    demo: usize,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        let lessons = vec![
            Lesson {
                number: 1,
                title: "Creating a Scene",
                demos: vec![Box::new(ShapeDemo::default())],
            },
            Lesson {
                number: 2,
                title: "Creating Text",
                demos: vec![
                    Box::new(OverlayDemo::default()),
                    Box::new(CanvasTextDemo::default()),
                    Box::new(VoxelTextDemo::default()),
                ],
            },
            Lesson {
                number: 3,
                title: "Drawing Lines",
                demos: vec![
                    Box::new(LineTypesDemo::default()),
                    Box::new(DrawingDemo::default()),
                    Box::new(CurveDemo::default()),
                ],
            },
            Lesson {
                number: 4,
                title: "Common Questions Answered",
                demos: vec![
                    Box::new(CoordinateDemo::default()),
                    Box::new(BlackScreenDemo::default()),
                    Box::new(MaterialDemo::default()),
                    Box::new(DoubleSideDemo::default()),
                ],
            },
        ];
        Self {
            lessons,
            lesson: 0,
            demo: 0,
        }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// `(lesson index, demo index)` of the selected demo, both from 0.
    pub fn selected(&self) -> (usize, usize) {
        (self.lesson, self.demo)
    }

    pub fn current(&self) -> Option<&dyn Demo> {
        self.lessons
            .get(self.lesson)?
            .demos
            .get(self.demo)
            .map(|demo| demo.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn Demo + 'static)> {
        self.lessons
            .get_mut(self.lesson)?
            .demos
            .get_mut(self.demo)
            .map(|demo| demo.as_mut())
    }

    /// Switches to another demo. Out-of-range indices are ignored. Returns
    /// whether the selection changed.
    pub fn select(&mut self, lesson: usize, demo: usize, surface: Option<Surface>) -> bool {
        let exists = self
            .lessons
            .get(lesson)
            .is_some_and(|entry| demo < entry.demos.len());
        if !exists || (lesson, demo) == (self.lesson, self.demo) {
            return false;
        }
        if let Some(current) = self.current_mut() {
            current.unmount();
        }
        self.lesson = lesson;
        self.demo = demo;
        self.mount_current(surface);
        true
    }

    /// Mounts the selected demo if it is not mounted yet.
    pub fn mount_current(&mut self, surface: Option<Surface>) -> bool {
        let Some(demo) = self.current_mut() else {
            return false;
        };
        let surface = surface.map(|_| Surface::for_config(&demo.config()));
        demo.mount(surface)
    }

    /// Number of mounted demos across the whole catalog.
    pub fn mounted_count(&self) -> usize {
        self.lessons
            .iter()
            .flat_map(|lesson| lesson.demos.iter())
            .filter(|demo| demo.is_mounted())
            .count()
    }

    /// Draws the lesson/demo picker. Returns the entry the user clicked.
    pub fn picker(&self, ui: &mut egui::Ui) -> Option<(usize, usize)> {
        let mut picked = None;
        for (lesson_index, lesson) in self.lessons.iter().enumerate() {
            ui.label(
                egui::RichText::new(format!("LESSON {}", lesson.number))
                    .small()
                    .strong(),
            );
            ui.label(lesson.title);
            for (demo_index, demo) in lesson.demos.iter().enumerate() {
                let selected = (lesson_index, demo_index) == (self.lesson, self.demo);
                if ui.selectable_label(selected, demo.title()).clicked() {
                    picked = Some((lesson_index, demo_index));
                }
            }
            ui.add_space(8.0);
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_eleven_demos_in_four_lessons() {
        let gallery = Gallery::new();
        assert_eq!(gallery.lessons().len(), 4);
        let total: usize = gallery.lessons().iter().map(|l| l.demos.len()).sum();
        assert_eq!(total, 11);
    }

    #[test]
    fn selecting_keeps_one_demo_mounted() {
        let mut gallery = Gallery::new();
        let surface = Some(Surface::new(500, 300));
        assert!(gallery.mount_current(surface));
        assert!(gallery.select(2, 1, surface));
        assert_eq!(gallery.mounted_count(), 1);
        assert_eq!(gallery.current().map(|demo| demo.title()), Some("Click to Draw"));
        assert!(!gallery.select(9, 0, surface));
        assert!(!gallery.select(2, 1, surface));
    }

    #[test]
    fn selection_without_surface_mounts_nothing() {
        let mut gallery = Gallery::new();
        assert!(gallery.select(3, 2, None));
        assert_eq!(gallery.mounted_count(), 0);
    }
}
