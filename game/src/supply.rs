use serde::{Deserialize, Serialize};
use tracing::info;

use qblock_engine::{EngineError, EngineResult, Piece, PieceId, PieceShape};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceTemplate {
    pub shape: PieceShape,
    pub color: String,
}

impl PieceTemplate {
    pub fn new(shape: PieceShape, color: impl Into<String>) -> Self {
        Self {
            shape,
            color: color.into(),
        }
    }
}

/// The three starter pieces: a 2x2 block, a T and a corner.
pub fn default_templates() -> Vec<PieceTemplate> {
    let bits: [(&[&[u8]], &str); 3] = [
        (&[&[1, 1], &[1, 1]], "bg-blue-300"),
        (&[&[1, 1, 1], &[0, 1, 0]], "bg-orange-300"),
        (&[&[1, 0], &[1, 1]], "bg-green-300"),
    ];
    bits.into_iter()
        .filter_map(|(rows, color)| {
            PieceShape::from_bits(rows)
                .ok()
                .map(|shape| PieceTemplate::new(shape, color))
        })
        .collect()
}

/// What happens once the active set runs dry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SupplyPolicy {
    /// Placed pieces are gone for the rest of the game.
    #[default]
    Fixed,
    /// A fresh copy of every template is dealt when the last piece is placed.
    Replenish,
}

/// Owns the active piece set offered to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSupply {
    templates: Vec<PieceTemplate>,
    policy: SupplyPolicy,
    active: Vec<Piece>,
    next_id: PieceId,
}

impl PieceSupply {
    pub fn new(templates: Vec<PieceTemplate>, policy: SupplyPolicy) -> EngineResult<Self> {
        if templates.is_empty() {
            return Err(EngineError::InvalidConfiguration {
                reason: "piece supply needs at least one template".to_string(),
            });
        }
        let mut supply = Self {
            templates,
            policy,
            active: Vec::new(),
            next_id: 1,
        };
        supply.deal();
        Ok(supply)
    }

    pub fn active(&self) -> &[Piece] {
        &self.active
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.active.iter().find(|p| p.id == id)
    }

    /// Removes `id` from the active set. Under [`SupplyPolicy::Replenish`] an
    /// emptied set is dealt again before returning.
    pub fn take(&mut self, id: PieceId) -> Option<Piece> {
        let idx = self.active.iter().position(|p| p.id == id)?;
        let piece = self.active.remove(idx);
        if self.active.is_empty() && self.policy == SupplyPolicy::Replenish {
            self.deal();
            info!(pieces = self.active.len(), "piece supply replenished");
        }
        Some(piece)
    }

    pub fn reset(&mut self) {
        self.active.clear();
        self.next_id = 1;
        self.deal();
    }

    fn deal(&mut self) {
        for template in &self.templates {
            self.active.push(Piece::new(
                self.next_id,
                template.shape.clone(),
                template.color.clone(),
            ));
            self.next_id = self.next_id.saturating_add(1);
        }
    }
}
