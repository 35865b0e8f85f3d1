//! Registry of the job cards currently on screen.
//!
//! One map from [`CardId`] to [`JobCard`]. Every card added gets a child of
//! the board's root cancellation token, so removing a card stops its poll
//! loop and [`JobBoard::cancel_all`] stops every loop at once.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use gophic_core::types::CardId;

use crate::card::JobCard;

#[derive(Default)]
pub struct JobBoard {
    cards: HashMap<CardId, JobCard>,
    order: Vec<CardId>,
    root: CancellationToken,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card, binding it to the board's cancellation tree.
    pub fn add(&mut self, mut card: JobCard) -> CardId {
        card.set_cancellation(self.root.child_token());
        let id = card.id();
        tracing::debug!(card_id = %id, file = %card.file_name(), "Card added");
        self.order.push(id);
        self.cards.insert(id, card);
        id
    }

    pub fn get(&self, id: CardId) -> Option<&JobCard> {
        self.cards.get(&id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut JobCard> {
        self.cards.get_mut(&id)
    }

    /// Remove a card, cancelling anything it still has in flight.
    pub fn remove(&mut self, id: CardId) -> Option<JobCard> {
        let card = self.cards.remove(&id)?;
        self.order.retain(|c| *c != id);
        card.cancel();
        tracing::debug!(card_id = %id, "Card removed");
        Some(card)
    }

    /// Card ids in insertion order.
    pub fn ids(&self) -> &[CardId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &JobCard> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Mutable access to every card at once, in insertion order, for
    /// driving them concurrently.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut JobCard> {
        let position: HashMap<CardId, usize> =
            self.order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut cards: Vec<&mut JobCard> = self.cards.values_mut().collect();
        cards.sort_by_key(|card| position.get(&card.id()).copied());
        cards.into_iter()
    }

    /// Token whose cancellation stops every card on the board.
    pub fn cancellation(&self) -> CancellationToken {
        self.root.clone()
    }

    pub fn cancel_all(&self) {
        self.root.cancel();
    }
}
