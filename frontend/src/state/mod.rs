//! 页面状态容器
//!
//! 编辑状态与删除流程是纯数据结构，页面用 `RwSignal` 包裹并在事件中修改；
//! 生成表单直接由信号组成；高潮进度按冒险 id 保存在本地存储。

pub mod climax_store;
pub mod delete_flow;
pub mod edit_state;
pub mod generate_form;

pub use climax_store::ClimaxStore;
pub use delete_flow::{DeleteFlow, DeleteTarget};
pub use edit_state::{
    AdventureEditState, Notification, ProgressStep, execute_plan, load_adventure,
    submit_progress,
};
pub use generate_form::GenerateForm;
