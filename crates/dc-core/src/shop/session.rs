//! Vendor state machine
//!
//! category -> item -> attribute. `Q` always backs out one level; from the
//! category menu it ends the visit.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::info;

use dc_rng::RandomSource;

use super::{ItemEffect, PriceList, ShopCategory, ShopItem};
use crate::HEALING_POTION_HP;
use crate::event::{Event, PromptOption};
use crate::player::{Attribute, EquipmentSlot, Player};

const CANCEL_KEY: &str = "Q";

/// Current vendor menu. The item phase remembers its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VendorPhase {
    #[default]
    Category,
    Item(ShopCategory),
    /// Choosing what the attribute enhancer raises.
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorOutcome {
    Continue,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSession {
    phase: VendorPhase,
}

impl VendorSession {
    /// Greet the player and show the category menu.
    pub fn open(player: &Player, prices: &PriceList, events: &mut Vec<Event>) -> Self {
        let session = Self::resume(VendorPhase::Category);
        events.push(Event::info("\"Welcome, traveller! Have a look at my wares.\""));
        events.push(session.prompt(player, prices));
        session
    }

    pub fn resume(phase: VendorPhase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> VendorPhase {
        self.phase
    }

    pub fn handle<R: RandomSource>(
        &mut self,
        command: &str,
        player: &mut Player,
        prices: &PriceList,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> VendorOutcome {
        let outcome = if command == CANCEL_KEY {
            self.back(events)
        } else {
            match self.phase {
                VendorPhase::Category => self.select_category(command, events),
                VendorPhase::Item(category) => {
                    self.select_item(category, command, player, prices, events)
                }
                VendorPhase::Attribute => self.select_attribute(command, player, prices, rng, events),
            }
        };

        if outcome == VendorOutcome::Continue {
            events.push(self.prompt(player, prices));
        }
        outcome
    }

    /// Same as pressing `Q`.
    pub fn cancel(
        &mut self,
        player: &Player,
        prices: &PriceList,
        events: &mut Vec<Event>,
    ) -> VendorOutcome {
        let outcome = self.back(events);
        if outcome == VendorOutcome::Continue {
            events.push(self.prompt(player, prices));
        }
        outcome
    }

    /// Menu for the current phase, with unaffordable entries disabled.
    pub fn prompt(&self, player: &Player, prices: &PriceList) -> Event {
        match self.phase {
            VendorPhase::Category => {
                let options = ShopCategory::iter()
                    .map(|category| {
                        PromptOption::new(category.key().to_string(), category.to_string())
                            .disabled_if(!player.can_afford(prices.cheapest(category)))
                    })
                    .collect();
                Event::prompt(
                    format!("What would you like to buy? You have {} gold.", player.gold),
                    options,
                    true,
                )
            }
            VendorPhase::Item(category) => {
                let options = prices
                    .items(category)
                    .into_iter()
                    .map(|item| {
                        PromptOption::new(
                            item.key.to_string(),
                            format!("{} ({} gold)", item.name, item.price),
                        )
                        .disabled_if(!player.can_afford(item.price))
                    })
                    .collect();
                Event::prompt(
                    format!("{category} for sale. You have {} gold.", player.gold),
                    options,
                    true,
                )
            }
            VendorPhase::Attribute => {
                let options = [
                    ("S", "Strength"),
                    ("D", "Dexterity"),
                    ("I", "Intelligence"),
                    ("M", "Maximum hit points"),
                ]
                .into_iter()
                .map(|(key, label)| {
                    PromptOption::new(key, label)
                        .disabled_if(!player.can_afford(prices.attribute_potion))
                })
                .collect();
                Event::prompt("Which attribute should the potion enhance?", options, true)
            }
        }
    }

    fn back(&mut self, events: &mut Vec<Event>) -> VendorOutcome {
        match self.phase {
            VendorPhase::Category => {
                events.push(Event::info("\"Come back when you need something!\""));
                return VendorOutcome::Closed;
            }
            VendorPhase::Item(_) => self.phase = VendorPhase::Category,
            VendorPhase::Attribute => self.phase = VendorPhase::Item(ShopCategory::Potions),
        }
        VendorOutcome::Continue
    }

    fn select_category(&mut self, command: &str, events: &mut Vec<Event>) -> VendorOutcome {
        match ShopCategory::from_key(command) {
            Some(category) => self.phase = VendorPhase::Item(category),
            None => events.push(Event::error(format!(
                "The vendor doesn't sell \"{command}\"."
            ))),
        }
        VendorOutcome::Continue
    }

    fn select_item(
        &mut self,
        category: ShopCategory,
        command: &str,
        player: &mut Player,
        prices: &PriceList,
        events: &mut Vec<Event>,
    ) -> VendorOutcome {
        let Some(item) = prices.find(category, command) else {
            events.push(Event::error(format!(
                "The vendor has no \"{command}\" among the {category}."
            )));
            return VendorOutcome::Continue;
        };

        if !player.can_afford(item.price) {
            events.push(Event::info(format!(
                "The vendor laughs. \"{} gold for a {}? Come back when your purse is heavier.\"",
                player.gold, item.name
            )));
            return VendorOutcome::Continue;
        }

        if item.effect == ItemEffect::Enhancer {
            self.phase = VendorPhase::Attribute;
            return VendorOutcome::Continue;
        }

        player.gold -= item.price;
        apply_purchase(&item, player, events);
        info!(
            target: "dc_core.vendor",
            item = item.name,
            price = item.price,
            gold = player.gold,
            "purchase"
        );
        events.push(Event::info("\"A pleasure doing business!\""));
        VendorOutcome::Closed
    }

    fn select_attribute<R: RandomSource>(
        &mut self,
        command: &str,
        player: &mut Player,
        prices: &PriceList,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> VendorOutcome {
        let target = match command {
            "S" => Some(Attribute::Strength),
            "D" => Some(Attribute::Dexterity),
            "I" => Some(Attribute::Intelligence),
            "M" => None,
            _ => {
                events.push(Event::error(format!(
                    "\"{command}\" is not something the potion can enhance."
                )));
                return VendorOutcome::Continue;
            }
        };

        if !player.spend_gold(prices.attribute_potion) {
            events.push(Event::info(
                "You can no longer afford the potion. The vendor shrugs and packs up.",
            ));
            return VendorOutcome::Closed;
        }

        let amount = rng.randint(1, 6);
        match target {
            Some(attribute) => {
                let value = player.adjust_attribute(attribute, amount);
                events.push(Event::loot(format!(
                    "Your {attribute} rises to {value}."
                )));
            }
            None => {
                player.raise_max_hp(amount);
                events.push(Event::loot(format!(
                    "Your maximum hit points rise to {}.",
                    player.max_hp
                )));
            }
        }
        info!(
            target: "dc_core.vendor",
            amount,
            gold = player.gold,
            "attribute potion"
        );
        VendorOutcome::Closed
    }
}

fn apply_purchase(item: &ShopItem, player: &mut Player, events: &mut Vec<Event>) {
    match item.effect {
        ItemEffect::Equip(EquipmentSlot::Weapon, tier) => {
            player.weapon.equip(tier);
            events.push(Event::loot(format!("You now wield a {}.", item.name)));
        }
        ItemEffect::Equip(EquipmentSlot::Armor, tier) => {
            player.armor.equip(tier);
            events.push(Event::loot(format!("You now wear {} armor.", item.name)));
        }
        ItemEffect::Scroll(spell) => {
            player.spells.add(spell, 1);
            events.push(Event::loot(format!("You pocket a {}.", item.name)));
        }
        ItemEffect::Healing => {
            let healed = player.heal(HEALING_POTION_HP);
            events.push(Event::loot(format!("You drink the potion and recover {healed} hp.")));
        }
        ItemEffect::Enhancer => {}
    }
}
