pub mod card;
pub mod deck;
pub mod hand;
pub mod knowledge;
pub mod player;
pub mod score;
