pub mod item;
pub mod item_list;
pub mod label;
pub mod orchestrator;
pub mod scheduler;

pub use item::{Item, ItemState, ItemStatus};
pub use item_list::{Direction, ItemList, Summary};
pub use orchestrator::{CloneExecutor, CloneOrchestrator};
pub use scheduler::{DisplaySurface, RenderFrame, RenderRow, RenderScheduler};
