//! Built-in dataset served by the mock catalog.

use tcgshop_core::card::{Card, CardImages, CardMarket, CardPrices, SetRef};

const IMAGE_BASE: &str = "https://images.pokemontcg.io";

fn set(id: &str) -> SetRef {
    let name = match id {
        "base1" => "Base",
        "base2" => "Jungle",
        "base3" => "Fossil",
        _ => id,
    };
    SetRef {
        id: id.to_string(),
        name: name.to_string(),
        series: "Base".to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn card(
    set_id: &str,
    number: &str,
    name: &str,
    hp: &str,
    card_type: &str,
    rarity: &str,
    artist: &str,
    price: f64,
) -> Card {
    Card {
        id: format!("{set_id}-{number}"),
        name: name.to_string(),
        hp: Some(hp.to_string()),
        types: vec![card_type.to_string()],
        rarity: rarity.to_string(),
        set: set(set_id),
        number: number.to_string(),
        artist: artist.to_string(),
        images: CardImages {
            small: format!("{IMAGE_BASE}/{set_id}/{number}.png"),
            large: format!("{IMAGE_BASE}/{set_id}/{number}_hires.png"),
        },
        cardmarket: Some(CardMarket {
            url: format!("https://prices.pokemontcg.io/cardmarket/{set_id}-{number}"),
            updated_at: "2024/05/01".to_string(),
            prices: CardPrices {
                average_sell_price: price,
                low_price: price * 0.6,
                trend_price: price * 1.05,
                suggested_price: price * 1.2,
            },
        }),
    }
}

/// The fixture cards, in catalog order.
pub fn sample_cards() -> Vec<Card> {
    vec![
        card("base1", "2", "Blastoise", "100", "Water", "Rare Holo", "Ken Sugimori", 180.0),
        card("base1", "4", "Charizard", "120", "Fire", "Rare Holo", "Mitsuhiro Arita", 350.0),
        card("base1", "15", "Venusaur", "100", "Grass", "Rare Holo", "Mitsuhiro Arita", 95.5),
        card("base1", "24", "Charmeleon", "80", "Fire", "Uncommon", "Mitsuhiro Arita", 6.25),
        card("base1", "44", "Bulbasaur", "40", "Grass", "Common", "Mitsuhiro Arita", 3.5),
        card("base1", "46", "Charmander", "50", "Fire", "Common", "Mitsuhiro Arita", 4.75),
        card("base1", "58", "Pikachu", "40", "Lightning", "Common", "Mitsuhiro Arita", 5.0),
        card("base1", "63", "Squirtle", "40", "Water", "Common", "Mitsuhiro Arita", 3.25),
        card("base2", "10", "Scyther", "70", "Grass", "Rare Holo", "Ken Sugimori", 38.0),
        card("base2", "12", "Vaporeon", "80", "Water", "Rare Holo", "Keiji Kinebuchi", 42.0),
        card("base2", "60", "Pikachu", "50", "Lightning", "Common", "Mitsuhiro Arita", 2.5),
        card("base3", "4", "Gengar", "80", "Psychic", "Rare Holo", "Keiji Kinebuchi", 55.0),
        card("base3", "15", "Zapdos", "80", "Lightning", "Rare Holo", "Ken Sugimori", 48.0),
        card("base3", "50", "Magmar", "70", "Fire", "Uncommon", "Ken Sugimori", 1.75),
    ]
}
