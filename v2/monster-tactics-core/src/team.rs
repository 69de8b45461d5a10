//! Team rosters in the standard chess layout.

use rand::Rng;

use crate::catalog::{Catalog, TemplateId};
use crate::coord::Pos;
use crate::error::{TacticsError, TacticsResult};
use crate::piece::{Pack, Piece, PieceKind, Team};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The sixteen starting slots of `team`: pawns on files A-H, then the back
/// rank from file A to H. Player holds ranks 1-2, AI ranks 7-8.
pub fn standard_layout(team: Team) -> Vec<(PieceKind, Pos)> {
    let (back, pawns) = match team {
        Team::Player => (0, 1),
        Team::Ai => (7, 6),
    };
    let pawn_slots = (0..8).map(|col| (PieceKind::Pawn, Pos::from_row_col(pawns, col)));
    let back_slots = BACK_RANK
        .iter()
        .enumerate()
        .map(|(col, &kind)| (kind, Pos::from_row_col(back, col as u8)));
    pawn_slots.chain(back_slots).collect()
}

/// A random template of the right kind for every slot, from any pack.
pub fn random_team(catalog: &Catalog, team: Team, rng: &mut impl Rng) -> TacticsResult<Vec<Piece>> {
    standard_layout(team)
        .into_iter()
        .map(|(kind, pos)| {
            let choices = catalog.templates_of(kind, None);
            let id = pick(&choices, kind, rng)?;
            catalog.instantiate(id, team, pos)
        })
        .collect()
}

/// A full roster drawn from one pack. Kinds the pack has no template for
/// fall back to Starter Pack templates.
pub fn balanced_team(
    catalog: &Catalog,
    team: Team,
    pack: Pack,
    rng: &mut impl Rng,
) -> TacticsResult<Vec<Piece>> {
    standard_layout(team)
        .into_iter()
        .map(|(kind, pos)| {
            let mut choices = catalog.templates_of(kind, Some(pack));
            if choices.is_empty() {
                tracing::info!(%pack, %kind, "no template in pack, using Starter Pack");
                choices = catalog.templates_of(kind, Some(Pack::Starter));
            }
            let id = pick(&choices, kind, rng)?;
            catalog.instantiate(id, team, pos)
        })
        .collect()
}

fn pick(choices: &[TemplateId], kind: PieceKind, rng: &mut impl Rng) -> TacticsResult<TemplateId> {
    if choices.is_empty() {
        return Err(TacticsError::UnknownTemplate {
            id: kind.to_string(),
        });
    }
    Ok(choices[rng.random_range(0..choices.len())])
}
