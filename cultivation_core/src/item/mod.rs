//! Items: owned instances, on-use effects and inventory operations

mod effect;
mod instance;
mod inventory;

pub use effect::{dispatch, EffectOutcome, ItemEffect};
pub use instance::{create_item, ItemInstance};
pub use inventory::{
    buy_item, equip_item, equip_skill, grant_item, sell_item, unequip, unequip_skill, use_item,
};
