//! 删除确认流程
//!
//! 请求 -> 确认框 -> 确认 / 取消。场景与遭遇只有在未开始时才能发起删除。

use odyssey_shared::AdventureEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Adventure { id: u64 },
    Scene { index: usize },
    Encounter { scene: usize, position: usize },
}

impl DeleteTarget {
    /// 确认框中展示的对象名称
    pub fn label(&self) -> &'static str {
        match self {
            DeleteTarget::Adventure { .. } => "adventure",
            DeleteTarget::Scene { .. } => "scene",
            DeleteTarget::Encounter { .. } => "encounter",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteFlow {
    pending: Option<DeleteTarget>,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<DeleteTarget> {
        self.pending
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request_adventure(&mut self, id: u64) {
        self.pending = Some(DeleteTarget::Adventure { id });
    }

    /// 请求删除场景或遭遇，不满足删除条件时不打开确认框
    pub fn request(&mut self, target: DeleteTarget, editor: &AdventureEditor) -> bool {
        let allowed = match target {
            DeleteTarget::Adventure { .. } => true,
            DeleteTarget::Scene { index } => editor.can_delete_scene(index),
            DeleteTarget::Encounter { scene, position } => {
                editor.can_delete_encounter(scene, position)
            }
        };
        if allowed {
            self.pending = Some(target);
        }
        allowed
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// 返回待删除的对象并关闭确认框
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odyssey_shared::{Adventure, Encounter, Progress, Scene, SequencedList};

    fn editor() -> AdventureEditor {
        let started = Scene {
            id: Some(1),
            progress: Progress::InProgress,
            encounter_set: SequencedList::from_vec(vec![Encounter {
                id: Some(5),
                progress: Progress::Complete,
                ..Default::default()
            }]),
            ..Default::default()
        };
        let fresh = Scene {
            id: Some(2),
            encounter_set: SequencedList::from_vec(vec![Encounter::default()]),
            ..Default::default()
        };
        AdventureEditor::new(Adventure {
            id: Some(1),
            scene_set: SequencedList::from_vec(vec![started, fresh]),
            ..Default::default()
        })
    }

    #[test]
    fn test_request_confirm() {
        let editor = editor();
        let mut flow = DeleteFlow::new();

        assert!(flow.request(DeleteTarget::Scene { index: 1 }, &editor));
        assert!(flow.is_open());
        assert_eq!(flow.confirm(), Some(DeleteTarget::Scene { index: 1 }));
        assert!(!flow.is_open());
        assert_eq!(flow.confirm(), None);
    }

    #[test]
    fn test_started_entities_cannot_be_requested() {
        let editor = editor();
        let mut flow = DeleteFlow::new();

        assert!(!flow.request(DeleteTarget::Scene { index: 0 }, &editor));
        assert!(!flow.request(
            DeleteTarget::Encounter {
                scene: 0,
                position: 0
            },
            &editor
        ));
        assert!(!flow.is_open());

        assert!(flow.request(
            DeleteTarget::Encounter {
                scene: 1,
                position: 0
            },
            &editor
        ));
    }

    #[test]
    fn test_cancel_and_adventure() {
        let mut flow = DeleteFlow::new();
        flow.request_adventure(9);
        assert_eq!(flow.pending().map(|t| t.label()), Some("adventure"));
        flow.cancel();
        assert_eq!(flow.pending(), None);
    }
}
