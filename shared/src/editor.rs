//! 冒险内容树编辑器
//!
//! 在编辑模式下持有 Adventure -> Scenes -> Encounters 的可编辑树，
//! 负责结构变更（插入 / 删除并重新编号）、进度状态推进与进度汇总，
//! 并在保存时生成需要发往服务端的操作计划。
//!
//! 编辑器本身不做网络请求，也不检查 "只能删除未开始的节点" 这类界面策略，
//! 这些由调用方通过 `can_delete_*` 查询后执行。

use crate::model::{Adventure, Encounter, Progress, Scene};
use crate::protocol::{AdventurePayload, EncounterPayload, ScenePayload};
use thiserror::Error;
use tracing::{debug, warn};

// =========================================================
// 错误与寻址
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("index {index} is out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("the previous step must be complete first")]
    PreviousNotComplete,
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: Progress, to: Progress },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdventureField {
    Title,
    Game,
    CampaignSetting,
    Exposition,
    Incitement,
    Climax,
    Denouement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneField {
    Challenge,
    Setting,
    PlotTwist,
    Clue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterField {
    Type,
    Description,
    Stats,
}

/// 树中任意一个文本字段的地址
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPath {
    Adventure(AdventureField),
    Scene {
        scene: usize,
        field: SceneField,
    },
    Encounter {
        scene: usize,
        encounter: usize,
        field: EncounterField,
    },
}

// =========================================================
// 保存计划
// =========================================================

/// 保存时需要执行的一次远程操作
///
/// 新建的场景在创建前没有 id，其遭遇的 `scene_id` 由执行方在场景创建后填入，
/// 因此遭遇挂在所属场景之下。
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOp {
    CreateAdventure(AdventurePayload),
    UpdateAdventure { id: u64, payload: AdventurePayload },
    DeleteScene { id: u64 },
    DeleteEncounter { id: u64 },
    SaveScene {
        /// 场景在树中的下标，用于把服务端分配的 id 写回
        index: usize,
        id: Option<u64>,
        payload: ScenePayload,
        encounters: Vec<EncounterOp>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncounterOp {
    pub position: usize,
    pub id: Option<u64>,
    pub encounter: Encounter,
}

impl EncounterOp {
    pub fn payload(&self, scene_id: u64) -> EncounterPayload {
        EncounterPayload::new(scene_id, &self.encounter)
    }
}

/// 已在服务端完成的一步保存
///
/// 保存中途失败时，已完成的步骤通过 `AdventureEditor::record_saved` 写回本地树，
/// 重试时不会重复删除或重复创建。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedOp {
    EncounterDeleted { id: u64 },
    SceneDeleted { id: u64 },
    AdventureSaved { id: u64 },
    SceneSaved { index: usize, id: u64 },
    EncounterSaved { scene: usize, position: usize, id: u64 },
}

// =========================================================
// 编辑器
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AdventureEditor {
    adventure: Adventure,
    /// 最近一次从服务端加载的规范状态，用于撤销编辑
    baseline: Adventure,
    removed_scenes: Vec<u64>,
    removed_encounters: Vec<u64>,
}

impl AdventureEditor {
    pub fn new(adventure: Adventure) -> Self {
        let mut editor = Self {
            baseline: adventure.clone(),
            adventure,
            removed_scenes: Vec::new(),
            removed_encounters: Vec::new(),
        };
        editor.refresh_progress();
        editor.baseline = editor.adventure.clone();
        editor
    }

    pub fn adventure(&self) -> &Adventure {
        &self.adventure
    }

    pub fn scene_count(&self) -> usize {
        self.adventure.scene_set.len()
    }

    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.adventure.scene_set.get(index)
    }

    pub fn encounter(&self, scene: usize, position: usize) -> Option<&Encounter> {
        self.scene(scene)?.encounter_set.get(position)
    }

    /// 是否存在未保存的修改
    pub fn is_dirty(&self) -> bool {
        self.adventure != self.baseline
            || !self.removed_scenes.is_empty()
            || !self.removed_encounters.is_empty()
    }

    /// 用服务端返回的规范状态替换本地树，清空删除记录
    pub fn mark_loaded(&mut self, adventure: Adventure) {
        *self = Self::new(adventure);
    }

    /// 把一步已完成的保存写回本地树
    ///
    /// 删除完成后从删除记录中移除；创建完成后记下服务端分配的 id。
    pub fn record_saved(&mut self, op: SavedOp) {
        match op {
            SavedOp::EncounterDeleted { id } => self.removed_encounters.retain(|&r| r != id),
            SavedOp::SceneDeleted { id } => self.removed_scenes.retain(|&r| r != id),
            SavedOp::AdventureSaved { id } => self.adventure.id = Some(id),
            SavedOp::SceneSaved { index, id } => match self.scene_mut(index) {
                Ok(scene) => scene.id = Some(id),
                Err(e) => warn!(error = %e, "saved scene is no longer in the tree"),
            },
            SavedOp::EncounterSaved {
                scene,
                position,
                id,
            } => match self.encounter_mut(scene, position) {
                Ok(encounter) => encounter.id = Some(id),
                Err(e) => warn!(error = %e, "saved encounter is no longer in the tree"),
            },
        }
        debug!(?op, "recorded saved operation");
    }

    /// 放弃所有本地修改，恢复到最近一次加载的状态
    pub fn discard_changes(&mut self) {
        self.adventure = self.baseline.clone();
        self.removed_scenes.clear();
        self.removed_encounters.clear();
    }

    // --- 结构操作 ---

    /// 在 `index` 处插入空场景，之后的场景序号依次加一
    pub fn insert_scene(&mut self, index: usize) -> Result<(), EditError> {
        let len = self.scene_count();
        self.adventure
            .scene_set
            .insert_at(index, Scene::default())
            .map_err(|_| EditError::IndexOutOfBounds { index, len })?;
        debug!(index, scenes = len + 1, "scene inserted");
        self.refresh_progress();
        Ok(())
    }

    pub fn insert_scene_before(&mut self, index: usize) -> Result<(), EditError> {
        self.insert_scene(index)
    }

    /// 返回新场景的下标
    pub fn insert_scene_after(&mut self, index: usize) -> Result<usize, EditError> {
        let len = self.scene_count();
        if index >= len {
            return Err(EditError::IndexOutOfBounds { index, len });
        }
        self.insert_scene(index + 1)?;
        Ok(index + 1)
    }

    /// 删除场景，之后的场景序号依次减一
    ///
    /// 已持久化的场景会记入删除列表，在保存时删除远端记录。
    pub fn delete_scene(&mut self, index: usize) -> Result<Scene, EditError> {
        let len = self.scene_count();
        let removed = self
            .adventure
            .scene_set
            .remove_at(index)
            .ok_or(EditError::IndexOutOfBounds { index, len })?;
        if let Some(id) = removed.id {
            self.removed_scenes.push(id);
        }
        debug!(index, id = ?removed.id, "scene deleted");
        self.refresh_progress();
        Ok(removed)
    }

    pub fn insert_encounter(&mut self, scene: usize, position: usize) -> Result<(), EditError> {
        let encounters = &mut self.scene_mut(scene)?.encounter_set;
        let len = encounters.len();
        encounters
            .insert_at(position, Encounter::default())
            .map_err(|_| EditError::IndexOutOfBounds {
                index: position,
                len,
            })?;
        debug!(scene, position, "encounter inserted");
        self.refresh_progress();
        Ok(())
    }

    pub fn delete_encounter(&mut self, scene: usize, position: usize) -> Result<Encounter, EditError> {
        let encounters = &mut self.scene_mut(scene)?.encounter_set;
        let len = encounters.len();
        let removed = encounters
            .remove_at(position)
            .ok_or(EditError::IndexOutOfBounds {
                index: position,
                len,
            })?;
        if let Some(id) = removed.id {
            self.removed_encounters.push(id);
        }
        debug!(scene, position, id = ?removed.id, "encounter deleted");
        self.refresh_progress();
        Ok(removed)
    }

    /// 只有未开始的场景允许删除
    pub fn can_delete_scene(&self, index: usize) -> bool {
        self.scene(index)
            .is_some_and(|s| s.progress == Progress::NotStarted)
    }

    /// 只有未开始的遭遇允许删除
    pub fn can_delete_encounter(&self, scene: usize, position: usize) -> bool {
        self.encounter(scene, position)
            .is_some_and(|e| e.progress == Progress::NotStarted)
    }

    // --- 文本编辑 ---

    /// 修改任意节点上的文本字段，不改变结构
    pub fn update_text(&mut self, path: TextPath, value: impl Into<String>) -> Result<(), EditError> {
        let value = value.into();
        match path {
            TextPath::Adventure(field) => {
                let adventure = &mut self.adventure;
                match field {
                    AdventureField::Title => adventure.title = value,
                    AdventureField::Game => adventure.game = value,
                    AdventureField::CampaignSetting => {
                        adventure.campaign_setting = non_empty(value)
                    }
                    AdventureField::Exposition => adventure.exposition = value,
                    AdventureField::Incitement => adventure.incitement = value,
                    AdventureField::Climax => {
                        adventure.climax = value;
                        // 高潮文本的有无会改变进度的分母
                        self.refresh_progress();
                    }
                    AdventureField::Denouement => adventure.denoument = value,
                }
            }
            TextPath::Scene { scene, field } => {
                let target = self.scene_mut(scene)?;
                match field {
                    SceneField::Challenge => target.challenge = value,
                    SceneField::Setting => target.setting = value,
                    SceneField::PlotTwist => target.plot_twist = non_empty(value),
                    SceneField::Clue => target.clue = non_empty(value),
                }
            }
            TextPath::Encounter {
                scene,
                encounter,
                field,
            } => {
                let target = self.encounter_mut(scene, encounter)?;
                match field {
                    EncounterField::Type => target.encounter_type = value,
                    EncounterField::Description => target.description = value,
                    EncounterField::Stats => target.stats = non_empty(value),
                }
            }
        }
        Ok(())
    }

    // --- 进度状态 ---

    /// 第一个场景，或前一个场景已完成
    pub fn can_advance_scene(&self, index: usize) -> bool {
        index == 0
            || self
                .scene(index - 1)
                .is_some_and(|prev| prev.progress.is_complete())
    }

    /// 第一个遭遇，或同一场景中的前一个遭遇已完成
    pub fn can_advance_encounter(&self, scene: usize, position: usize) -> bool {
        position == 0
            || self
                .encounter(scene, position - 1)
                .is_some_and(|prev| prev.progress.is_complete())
    }

    /// 高潮排在最后一个场景之后
    pub fn can_advance_climax(&self) -> bool {
        self.adventure
            .scene_set
            .last()
            .is_none_or(|last| last.progress.is_complete())
    }

    pub fn start_scene(&mut self, index: usize) -> Result<Progress, EditError> {
        self.advance_scene(index, Progress::InProgress)
    }

    pub fn complete_scene(&mut self, index: usize) -> Result<Progress, EditError> {
        self.advance_scene(index, Progress::Complete)
    }

    pub fn start_encounter(&mut self, scene: usize, position: usize) -> Result<Progress, EditError> {
        self.advance_encounter(scene, position, Progress::InProgress)
    }

    pub fn complete_encounter(
        &mut self,
        scene: usize,
        position: usize,
    ) -> Result<Progress, EditError> {
        self.advance_encounter(scene, position, Progress::Complete)
    }

    pub fn start_climax(&mut self) -> Result<Progress, EditError> {
        self.advance_climax(Progress::InProgress)
    }

    pub fn complete_climax(&mut self) -> Result<Progress, EditError> {
        self.advance_climax(Progress::Complete)
    }

    fn advance_scene(&mut self, index: usize, target: Progress) -> Result<Progress, EditError> {
        let previous_complete = self.can_advance_scene(index);
        let scene = self.scene_mut(index)?;
        advance(&mut scene.progress, target, previous_complete)?;
        self.refresh_progress();
        Ok(target)
    }

    fn advance_encounter(
        &mut self,
        scene: usize,
        position: usize,
        target: Progress,
    ) -> Result<Progress, EditError> {
        let previous_complete = self.can_advance_encounter(scene, position);
        let encounter = self.encounter_mut(scene, position)?;
        advance(&mut encounter.progress, target, previous_complete)?;
        self.refresh_progress();
        Ok(target)
    }

    fn advance_climax(&mut self, target: Progress) -> Result<Progress, EditError> {
        let previous_complete = self.can_advance_climax();
        advance(&mut self.adventure.climax_progress, target, previous_complete)?;
        self.refresh_progress();
        Ok(target)
    }

    // --- 进度汇总 ---

    /// 汇总所有场景、遭遇（以及非空的高潮）的进度
    ///
    /// 每个节点贡献 0/50/100 到分子、100 到分母；结果限制在 [0, 100]，
    /// 没有任何节点时为 0。
    pub fn compute_progress(&self) -> f64 {
        let mut sum: u64 = 0;
        let mut divisor: u64 = 0;

        for scene in &self.adventure.scene_set {
            sum += u64::from(scene.progress.weight());
            divisor += 100;
            for encounter in &scene.encounter_set {
                sum += u64::from(encounter.progress.weight());
                divisor += 100;
            }
        }

        if self.adventure.has_climax() {
            sum += u64::from(self.adventure.climax_progress.weight());
            divisor += 100;
        }

        if divisor == 0 {
            return 0.0;
        }
        (sum as f64 / divisor as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn refresh_progress(&mut self) {
        self.adventure.progress = self.compute_progress();
    }

    // --- 保存 ---

    /// 生成持久化当前树所需的远程操作
    ///
    /// 顺序：先删除已移除的节点，再创建 / 更新冒险本身，最后按顺序保存场景及其遭遇。
    /// 冒险尚未创建时，场景中的 `adventure_id` 为 0，由执行方在创建冒险后替换。
    pub fn save_plan(&self) -> Vec<RemoteOp> {
        let mut ops = Vec::new();

        ops.extend(
            self.removed_encounters
                .iter()
                .map(|&id| RemoteOp::DeleteEncounter { id }),
        );
        ops.extend(
            self.removed_scenes
                .iter()
                .map(|&id| RemoteOp::DeleteScene { id }),
        );

        let payload = AdventurePayload::from(&self.adventure);
        let adventure_id = match self.adventure.id {
            Some(id) => {
                ops.push(RemoteOp::UpdateAdventure { id, payload });
                id
            }
            None => {
                ops.push(RemoteOp::CreateAdventure(payload));
                0
            }
        };

        for (index, scene) in self.adventure.scene_set.iter().enumerate() {
            ops.push(RemoteOp::SaveScene {
                index,
                id: scene.id,
                payload: ScenePayload::new(adventure_id, scene),
                encounters: scene
                    .encounter_set
                    .iter()
                    .enumerate()
                    .map(|(position, encounter)| EncounterOp {
                        position,
                        id: encounter.id,
                        encounter: encounter.clone(),
                    })
                    .collect(),
            });
        }

        ops
    }

    // --- 内部访问 ---

    fn scene_mut(&mut self, index: usize) -> Result<&mut Scene, EditError> {
        let len = self.adventure.scene_set.len();
        self.adventure
            .scene_set
            .get_mut(index)
            .ok_or(EditError::IndexOutOfBounds { index, len })
    }

    fn encounter_mut(&mut self, scene: usize, position: usize) -> Result<&mut Encounter, EditError> {
        let encounters = &mut self.scene_mut(scene)?.encounter_set;
        let len = encounters.len();
        encounters.get_mut(position).ok_or(EditError::IndexOutOfBounds {
            index: position,
            len,
        })
    }
}

/// 单向推进一步
fn advance(progress: &mut Progress, target: Progress, previous_complete: bool) -> Result<(), EditError> {
    if progress.next() != Some(target) {
        warn!(from = %progress, to = %target, "rejected progress transition");
        return Err(EditError::InvalidTransition {
            from: *progress,
            to: target,
        });
    }
    if !previous_complete {
        warn!(to = %target, "previous sibling is not complete");
        return Err(EditError::PreviousNotComplete);
    }
    *progress = target;
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
