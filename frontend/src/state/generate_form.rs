//! 生成表单状态
//!
//! 将零散的 signal 整合为 `GenerateForm`，负责数据的持有、重置以及到请求对象的转换。

use leptos::prelude::*;
use odyssey_shared::catalog::{Advancement, find_game, is_custom_game};
use odyssey_shared::protocol::GenerateAdventureRequest;
use odyssey_shared::validation::is_safe_text;
use odyssey_shared::{ClientError, ClientResult};

pub const MISSING_FIELDS_MESSAGE: &str = "One or more required fields is missing input.";

pub const PLAYERS_RANGE: (u32, u32) = (1, 10);
pub const SCENES_RANGE: (u32, u32) = (1, 10);
pub const ENCOUNTERS_RANGE: (u32, u32) = (1, 5);
pub const PERCENT_RANGE: (u32, u32) = (0, 100);

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，可以直接作为 Props 传递。
#[derive(Clone, Copy)]
pub struct GenerateForm {
    pub game: RwSignal<String>,
    /// 选择 "Other" / homebrew 时填写的游戏名称
    pub custom_game: RwSignal<String>,
    pub homebrew_description: RwSignal<String>,
    pub campaign_setting: RwSignal<String>,
    pub players: RwSignal<u32>,
    pub scenes: RwSignal<u32>,
    pub encounters: RwSignal<u32>,
    pub plot_twists: RwSignal<u32>,
    pub clues: RwSignal<u32>,
    pub level: RwSignal<String>,
    pub experience: RwSignal<String>,
    pub context: RwSignal<String>,
}

impl GenerateForm {
    pub fn new() -> Self {
        Self {
            game: RwSignal::new(String::new()),
            custom_game: RwSignal::new(String::new()),
            homebrew_description: RwSignal::new(String::new()),
            campaign_setting: RwSignal::new(String::new()),
            players: RwSignal::new(4),
            scenes: RwSignal::new(3),
            encounters: RwSignal::new(2),
            plot_twists: RwSignal::new(50),
            clues: RwSignal::new(50),
            level: RwSignal::new(String::new()),
            experience: RwSignal::new(String::new()),
            context: RwSignal::new(String::new()),
        }
    }

    /// 切换游戏时清空与之相关的字段
    pub fn select_game(&self, name: String) {
        self.game.set(name);
        self.custom_game.set(String::new());
        self.homebrew_description.set(String::new());
        self.campaign_setting.set(String::new());
        self.level.set(String::new());
        self.experience.set(String::new());
    }

    pub fn reset(&self) {
        self.select_game(String::new());
        self.players.set(4);
        self.scenes.set(3);
        self.encounters.set(2);
        self.plot_twists.set(50);
        self.clues.set(50);
        self.context.set(String::new());
    }

    /// 当前游戏的成长方式，未选择时为 `None`
    pub fn advancement(&self) -> Option<Advancement> {
        self.game.with(|name| find_game(name).map(|entry| entry.advancement))
    }

    /// 当前游戏可选的官方设定
    pub fn settings(&self) -> &'static [&'static str] {
        self.game
            .with(|name| find_game(name).map(|entry| entry.settings))
            .unwrap_or(&[])
    }

    pub fn is_custom(&self) -> bool {
        self.game.with(|name| is_custom_game(name))
    }

    /// 最终提交的游戏名称
    pub fn game_title(&self) -> String {
        let custom = self.custom_game.get_untracked();
        if self.is_custom() && !custom.trim().is_empty() {
            custom.trim().to_string()
        } else {
            self.game.get_untracked()
        }
    }

    /// 校验并转换为生成请求
    pub fn to_request(&self) -> ClientResult<GenerateAdventureRequest> {
        let game = self.game_title();
        if game.trim().is_empty() {
            return Err(ClientError::validation("game", MISSING_FIELDS_MESSAGE));
        }

        let players = in_range("players", self.players.get_untracked(), PLAYERS_RANGE)?;
        let scenes = in_range("scenes", self.scenes.get_untracked(), SCENES_RANGE)?;
        let encounters = in_range("encounters", self.encounters.get_untracked(), ENCOUNTERS_RANGE)?;
        let plot_twists = in_range("plot twists", self.plot_twists.get_untracked(), PERCENT_RANGE)?;
        let clues = in_range("clues", self.clues.get_untracked(), PERCENT_RANGE)?;

        let advancement = self.advancement().unwrap_or(Advancement::Either);
        let level = if advancement.uses_levels() {
            parse_optional("level", &self.level.get_untracked())?
        } else {
            None
        };
        let experience = if advancement.uses_points() {
            parse_optional("experience", &self.experience.get_untracked())?
        } else {
            None
        };

        let homebrew_description = if self.is_custom() {
            optional_text(self.homebrew_description.get_untracked())
        } else {
            None
        };
        let campaign_setting = optional_text(self.campaign_setting.get_untracked());
        let context = optional_text(self.context.get_untracked());

        let texts = [Some(&game), homebrew_description.as_ref(), campaign_setting.as_ref(), context.as_ref()];
        if texts.into_iter().flatten().any(|text| !is_safe_text(text)) {
            return Err(ClientError::validation(
                "context",
                "The form contains text that cannot be submitted.",
            ));
        }

        Ok(GenerateAdventureRequest {
            game,
            players,
            scenes,
            encounters,
            plot_twists,
            clues,
            homebrew_description,
            campaign_setting,
            level,
            experience,
            context,
        })
    }
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self::new()
    }
}

fn in_range(field: &str, value: u32, (min, max): (u32, u32)) -> ClientResult<u32> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ClientError::validation(
            field,
            format!("The number of {} must be between {} and {}.", field, min, max),
        ))
    }
}

fn parse_optional(field: &str, raw: &str) -> ClientResult<Option<u32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ClientError::validation(field, format!("Please enter a whole number for {}.", field)))
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
