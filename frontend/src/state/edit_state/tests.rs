use super::*;
use crate::config::AppConfig;
use crate::web::mock::MockClient;
use crate::web::storage::MemoryStorage;
use odyssey_shared::protocol::HttpMethod;
use odyssey_shared::{Encounter, Scene, SequencedList, TextPath};
use odyssey_shared::editor::{AdventureField, SceneField};

fn no_cookies() -> Option<String> {
    None
}

fn api(mock: &MockClient) -> OdysseyApi<MockClient> {
    OdysseyApi::new(mock.clone(), AppConfig::default(), no_cookies)
}

fn encounter(id: u64) -> Encounter {
    Encounter {
        id: Some(id),
        encounter_type: "Social".into(),
        description: "Haggle with the ferryman".into(),
        ..Default::default()
    }
}

fn scene(id: u64, encounters: Vec<Encounter>) -> Scene {
    Scene {
        id: Some(id),
        challenge: "Cross the river".into(),
        setting: "Ford".into(),
        encounter_set: SequencedList::from_vec(encounters),
        ..Default::default()
    }
}

fn adventure() -> Adventure {
    Adventure {
        id: Some(4),
        title: "River Run".into(),
        user_id: Some(1),
        game: "D&D".into(),
        scene_set: SequencedList::from_vec(vec![
            scene(10, vec![encounter(100)]),
            scene(11, vec![]),
        ]),
        ..Default::default()
    }
}

fn json(adventure: &Adventure) -> String {
    serde_json::to_string(adventure).unwrap()
}

fn climax_store() -> ClimaxStore<MemoryStorage> {
    ClimaxStore::new(MemoryStorage::new())
}

/// 与页面的保存按钮相同的流程：begin_save -> execute_plan -> finish_save
async fn save(
    state: &mut AdventureEditState,
    api: &OdysseyApi<MockClient>,
    climax: &ClimaxStore<MemoryStorage>,
) -> bool {
    let Some(plan) = state.begin_save() else {
        return false;
    };
    let report = execute_plan(api, climax, plan).await;
    let ok = report.result.is_ok();
    state.finish_save(report);
    ok
}

/// 与页面的进度按钮相同的流程：begin_progress -> submit_progress -> finish_progress
async fn advance(
    state: &mut AdventureEditState,
    api: &OdysseyApi<MockClient>,
    climax: &ClimaxStore<MemoryStorage>,
    step: ProgressStep,
) -> bool {
    let Some(update) = state.begin_progress(step) else {
        return false;
    };
    let result = submit_progress(api, climax, update).await;
    let ok = result.is_ok();
    state.finish_progress(result);
    ok
}

// ===== 编辑模式 =====

#[test]
fn test_edits_require_edit_mode() {
    let mut state = AdventureEditState::new(adventure());
    assert!(state.edit(|e| e.insert_scene(0)).is_none());
    assert_eq!(state.editor().scene_count(), 2);

    assert!(state.begin_edit());
    assert!(state.edit(|e| e.insert_scene(0)).is_some());
    assert_eq!(state.editor().scene_count(), 3);
}

#[test]
fn test_rejected_edit_becomes_notification() {
    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    assert!(state.edit(|e| e.insert_scene(7)).is_none());
    assert!(state.notification().unwrap().is_error);
}

#[test]
fn test_cancel_edit_restores_loaded_state() {
    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    state.edit(|e| e.update_text(TextPath::Adventure(AdventureField::Title), "Changed"));
    state.edit(|e| e.delete_scene(1));

    state.cancel_edit();
    assert!(!state.is_editing());
    assert_eq!(state.adventure().title, "River Run");
    assert_eq!(state.editor().scene_count(), 2);
}

#[test]
fn test_loading_refuses_mutations() {
    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    let plan = state.begin_save();
    assert!(plan.is_some());
    assert!(state.is_loading());

    assert!(state.edit(|e| e.insert_scene(0)).is_none());
    assert!(state.begin_save().is_none());
    assert_eq!(state.editor().scene_count(), 2);
    assert!(state.notification().unwrap().is_error);
}

#[test]
fn test_apply_delete_checks_progress() {
    let mut started = adventure();
    if let Some(first) = started.scene_set.get_mut(0) {
        first.progress = Progress::InProgress;
    }
    let mut state = AdventureEditState::new(started);
    state.begin_edit();

    assert!(!state.apply_delete(DeleteTarget::Scene { index: 0 }));
    assert!(state.apply_delete(DeleteTarget::Scene { index: 1 }));
    assert_eq!(state.editor().scene_count(), 1);
}

#[test]
fn test_validation_blocks_save() {
    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    state.edit(|e| {
        e.update_text(
            TextPath::Scene {
                scene: 0,
                field: SceneField::Clue,
            },
            "drop table scene",
        )
    });
    assert!(state.begin_save().is_none());
    assert!(!state.is_loading());
    assert!(state.notification().unwrap().message.contains("clue"));

    let mut untitled = AdventureEditState::new(Adventure::default());
    assert!(untitled.begin_save().is_none());
}

// ===== 保存 =====

#[tokio::test]
async fn test_save_runs_plan_then_reloads() {
    let mock = MockClient::new();
    let mut canonical = adventure();
    canonical.title = "River Run (saved)".into();

    mock.on(HttpMethod::Delete, "/scenes/11/", 204, "");
    mock.on(HttpMethod::Patch, "/adventures/4/", 200, &json(&adventure()));
    mock.on(HttpMethod::Patch, "/scenes/10/", 200, r#"{"id": 10}"#);
    mock.on(HttpMethod::Patch, "/encounters/100/", 200, r#"{"id": 100}"#);
    mock.on(HttpMethod::Post, "/scenes/", 201, r#"{"id": 12}"#);
    mock.on(HttpMethod::Post, "/encounters/", 201, r#"{"id": 120}"#);
    mock.on(HttpMethod::Get, "/adventures/4/", 200, &json(&canonical));

    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    state.edit(|e| e.delete_scene(1));
    state.edit(|e| e.insert_scene_after(0));
    state.edit(|e| e.insert_encounter(1, 0));

    assert!(save(&mut state, &api(&mock), &climax_store()).await);
    assert_eq!(
        mock.calls(),
        vec![
            "DELETE /api/scenes/11/",
            "PATCH /api/adventures/4/",
            "PATCH /api/scenes/10/",
            "PATCH /api/encounters/100/",
            "POST /api/scenes/",
            "POST /api/encounters/",
            "GET /api/adventures/4/",
        ]
    );

    // 新场景的序号与新遭遇的 scene_id
    let sent = mock.sent();
    let scene_body: serde_json::Value = serde_json::from_str(sent[4].body.as_deref().unwrap()).unwrap();
    assert_eq!(scene_body["sequence"], 2);
    assert_eq!(scene_body["adventure_id"], 4);
    let encounter_body: serde_json::Value =
        serde_json::from_str(sent[5].body.as_deref().unwrap()).unwrap();
    assert_eq!(encounter_body["scene_id"], 12);

    assert!(!state.is_editing());
    assert!(!state.is_loading());
    assert!(!state.editor().is_dirty());
    assert_eq!(state.adventure().title, "River Run (saved)");
    assert_eq!(
        state.notification(),
        Some(&Notification::success(SAVE_SUCCESS_MESSAGE))
    );
}

#[tokio::test]
async fn test_save_new_adventure_uses_created_id() {
    let mock = MockClient::new();
    let mut created = adventure();
    created.id = Some(55);
    created.scene_set = SequencedList::new();
    mock.on(HttpMethod::Post, "/adventures/", 201, &json(&created));
    mock.on(HttpMethod::Post, "/scenes/", 201, r#"{"id": 70}"#);
    mock.on(HttpMethod::Get, "/adventures/55/", 200, &json(&created));

    let mut draft = adventure();
    draft.id = None;
    draft.scene_set = SequencedList::from_vec(vec![Scene {
        challenge: "Ambush".into(),
        ..Default::default()
    }]);
    let mut state = AdventureEditState::draft(draft);

    assert!(save(&mut state, &api(&mock), &climax_store()).await);
    let sent = mock.sent();
    let scene_body: serde_json::Value = serde_json::from_str(sent[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(scene_body["adventure_id"], 55);
    assert_eq!(state.adventure().id, Some(55));
}

#[tokio::test]
async fn test_failed_save_keeps_local_edits() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Patch, "/adventures/4/", 500, "boom");

    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    state.edit(|e| e.update_text(TextPath::Adventure(AdventureField::Title), "Unsaved"));

    assert!(!save(&mut state, &api(&mock), &climax_store()).await);
    assert!(state.is_editing());
    assert!(!state.is_loading());
    assert_eq!(state.adventure().title, "Unsaved");
    assert_eq!(
        state.notification().map(|n| n.message.as_str()),
        Some(odyssey_shared::GENERIC_ERROR_MESSAGE)
    );
    assert_eq!(mock.calls().len(), 1);
}

// ===== 进度 =====

#[tokio::test]
async fn test_advance_persists_progress() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Patch, "/scenes/10/", 200, r#"{"id": 10}"#);
    let mut state = AdventureEditState::new(adventure());

    assert!(advance(&mut state, &api(&mock), &climax_store(), ProgressStep::StartScene(0)).await);
    assert_eq!(
        state.editor().scene(0).unwrap().progress,
        Progress::InProgress
    );
    assert!(!state.editor().is_dirty());
    assert_eq!(
        mock.sent()[0].body.as_deref(),
        Some(r#"{"progress":"In Progress"}"#)
    );
}

#[tokio::test]
async fn test_advance_rolls_back_on_failure() {
    let mock = MockClient::new();
    mock.fail(HttpMethod::Patch, "/encounters/100/");
    let mut state = AdventureEditState::new(adventure());

    assert!(!advance(&mut state, &api(&mock), &climax_store(), ProgressStep::StartEncounter(0, 0)).await);
    assert_eq!(
        state.editor().encounter(0, 0).unwrap().progress,
        Progress::NotStarted
    );
    assert!(state.notification().unwrap().is_error);
}

#[tokio::test]
async fn test_gated_step_sends_nothing() {
    let mock = MockClient::new();
    let mut state = AdventureEditState::new(adventure());

    assert!(!advance(&mut state, &api(&mock), &climax_store(), ProgressStep::StartScene(1)).await);
    assert!(mock.sent().is_empty());
    assert_eq!(state.editor().scene(1).unwrap().progress, Progress::NotStarted);
}

#[tokio::test]
async fn test_climax_progress_kept_locally_across_reload() {
    let mock = MockClient::new();
    let climax = climax_store();
    let mut finished = adventure();
    finished.climax = "Dragon fight".into();
    for scene in finished.scene_set.iter_mut() {
        scene.progress = Progress::Complete;
    }
    mock.on(HttpMethod::Get, "/adventures/4/", 200, &json(&finished));
    let mut state = AdventureEditState::new(finished);

    assert!(advance(&mut state, &api(&mock), &climax, ProgressStep::StartClimax).await);
    assert!(mock.sent().is_empty());
    assert_eq!(climax.load(4), Progress::InProgress);

    // 服务端不返回高潮进度，重新加载后从本地存储恢复
    let loaded = load_adventure(&api(&mock), &climax, 4).await.unwrap();
    let reloaded = AdventureEditState::new(loaded);
    assert_eq!(reloaded.adventure().climax_progress, Progress::InProgress);
    assert_eq!(reloaded.adventure().progress, state.adventure().progress);
}

#[tokio::test]
async fn test_adventure_payload_has_no_climax_progress() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Patch, "/adventures/4/", 200, &json(&adventure()));
    mock.on(HttpMethod::Patch, "/scenes/10/", 200, r#"{"id": 10}"#);
    mock.on(HttpMethod::Patch, "/scenes/11/", 200, r#"{"id": 11}"#);
    mock.on(HttpMethod::Patch, "/encounters/100/", 200, r#"{"id": 100}"#);
    mock.on(HttpMethod::Get, "/adventures/4/", 200, &json(&adventure()));

    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    assert!(save(&mut state, &api(&mock), &climax_store()).await);

    let body: serde_json::Value =
        serde_json::from_str(mock.sent()[0].body.as_deref().unwrap()).unwrap();
    assert!(body.get("climax_progress").is_none());
    assert!(body.get("progress").is_some());
}

// ===== 部分保存后重试 =====

#[tokio::test]
async fn test_retry_after_partial_save_sends_only_remaining_steps() {
    let mock = MockClient::new();
    let climax = climax_store();
    mock.on(HttpMethod::Delete, "/scenes/11/", 204, "");
    mock.on(HttpMethod::Patch, "/adventures/4/", 200, &json(&adventure()));
    mock.on(HttpMethod::Patch, "/scenes/10/", 200, r#"{"id": 10}"#);
    mock.on(HttpMethod::Patch, "/scenes/12/", 200, r#"{"id": 12}"#);
    mock.on(HttpMethod::Patch, "/encounters/100/", 200, r#"{"id": 100}"#);
    mock.on(HttpMethod::Post, "/scenes/", 201, r#"{"id": 12}"#);
    mock.fail(HttpMethod::Post, "/encounters/");
    mock.on(HttpMethod::Post, "/encounters/", 201, r#"{"id": 120}"#);
    mock.on(HttpMethod::Get, "/adventures/4/", 200, &json(&adventure()));

    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    state.edit(|e| e.delete_scene(1));
    state.edit(|e| e.insert_scene_after(0));
    state.edit(|e| e.insert_encounter(1, 0));

    assert!(!save(&mut state, &api(&mock), &climax).await);
    assert!(state.is_editing());
    assert_eq!(state.editor().scene(1).unwrap().id, Some(12));
    assert_eq!(state.editor().encounter(1, 0).unwrap().id, None);
    let first_attempt = mock.calls().len();
    assert_eq!(first_attempt, 6);

    assert!(save(&mut state, &api(&mock), &climax).await);
    assert_eq!(
        mock.calls()[first_attempt..].to_vec(),
        vec![
            "PATCH /api/adventures/4/",
            "PATCH /api/scenes/10/",
            "PATCH /api/encounters/100/",
            "PATCH /api/scenes/12/",
            "POST /api/encounters/",
            "GET /api/adventures/4/",
        ]
    );
    let sent = mock.sent();
    let encounter_body: serde_json::Value =
        serde_json::from_str(sent[sent.len() - 2].body.as_deref().unwrap()).unwrap();
    assert_eq!(encounter_body["scene_id"], 12);
    assert!(!state.is_editing());
}

#[tokio::test]
async fn test_delete_of_missing_resource_counts_as_done() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Delete, "/scenes/11/", 404, r#"{"error": "gone"}"#);
    mock.on(HttpMethod::Patch, "/adventures/4/", 200, &json(&adventure()));
    mock.on(HttpMethod::Patch, "/scenes/10/", 200, r#"{"id": 10}"#);
    mock.on(HttpMethod::Patch, "/encounters/100/", 200, r#"{"id": 100}"#);
    mock.on(HttpMethod::Get, "/adventures/4/", 200, &json(&adventure()));

    let mut state = AdventureEditState::new(adventure());
    state.begin_edit();
    state.edit(|e| e.delete_scene(1));

    assert!(save(&mut state, &api(&mock), &climax_store()).await);
    assert_eq!(mock.calls()[0], "DELETE /api/scenes/11/");
    assert!(!state.is_editing());
}

#[tokio::test]
async fn test_partial_save_of_new_adventure_keeps_created_id() {
    let mock = MockClient::new();
    let mut created = adventure();
    created.id = Some(55);
    created.scene_set = SequencedList::new();
    mock.on(HttpMethod::Post, "/adventures/", 201, &json(&created));
    mock.on(HttpMethod::Patch, "/adventures/55/", 200, &json(&created));
    mock.fail(HttpMethod::Post, "/scenes/");
    mock.on(HttpMethod::Post, "/scenes/", 201, r#"{"id": 70}"#);
    mock.on(HttpMethod::Get, "/adventures/55/", 200, &json(&created));

    let mut draft = adventure();
    draft.id = None;
    draft.scene_set = SequencedList::from_vec(vec![Scene {
        challenge: "Ambush".into(),
        ..Default::default()
    }]);
    let mut state = AdventureEditState::draft(draft);

    assert!(!save(&mut state, &api(&mock), &climax_store()).await);
    assert_eq!(state.adventure().id, Some(55));

    // 重试时更新已创建的冒险，而不是再创建一个
    assert!(save(&mut state, &api(&mock), &climax_store()).await);
    let calls = mock.calls();
    assert_eq!(calls.iter().filter(|c| *c == "POST /api/adventures/").count(), 1);
    assert!(calls.contains(&"PATCH /api/adventures/55/".to_string()));
}
