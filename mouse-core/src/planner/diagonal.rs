/*
    Diagonal conversion

    Every 90 degree turn is one quarter cell, every 180 degree turn two quarters of the same
    side. A chain is a maximal run of at least two consecutive quarters whose sides alternate;
    the robot crosses it on the diagonal instead of turning in each cell.
*/

use heapless::Vec;

use super::push_step;
use super::Movement;
use super::MovementPlan;
use super::PlanError;
use super::PlanStep;
use super::Side;
use super::MAX_PLAN_LEN;

const MAX_SLOTS: usize = 2 * MAX_PLAN_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Half {
    Whole,
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Plain(PlanStep),
    Quarter { side: Side, half: Half },
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    token: Token,
    in_chain: bool,
    consumed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    AfterForward,
    Turn135,
    AfterChain,
    Turn45,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    IntoChain,
    Turn135 { forward_follows: bool },
    Turn45 { forward_follows: bool },
}

#[derive(Debug, Clone, Copy)]
struct Chain {
    first: usize,
    last: usize,
    entry: Entry,
    exit: Exit,
}

impl Slot {
    fn quarter_side(&self) -> Option<Side> {
        match self.token {
            Token::Quarter { side, .. } => Some(side),
            Token::Plain(_) => None,
        }
    }

    /// A quarter that is neither part of a chain nor taken by one.
    fn free_quarter(&self) -> Option<Side> {
        if self.in_chain || self.consumed {
            return None;
        }
        self.quarter_side()
    }
}

fn expand(plan: &[PlanStep]) -> Result<Vec<Slot, MAX_SLOTS>, PlanError> {
    let mut slots: Vec<Slot, MAX_SLOTS> = Vec::new();
    let mut push = |token: Token| {
        slots
            .push(Slot {
                token,
                in_chain: false,
                consumed: false,
            })
            .map_err(|_| PlanError::Overflow)
    };

    for &(movement, count) in plan {
        let side = match movement {
            Movement::TurnLeft90 | Movement::TurnLeft180 => Some(Side::Left),
            Movement::TurnRight90 | Movement::TurnRight180 => Some(Side::Right),
            _ => None,
        };
        let Some(side) = side else {
            push(Token::Plain((movement, count)))?;
            continue;
        };

        for _ in 0..count {
            if matches!(movement, Movement::TurnLeft180 | Movement::TurnRight180) {
                push(Token::Quarter { side, half: Half::First })?;
                push(Token::Quarter { side, half: Half::Second })?;
            } else {
                push(Token::Quarter { side, half: Half::Whole })?;
            }
        }
    }

    Ok(slots)
}

fn find_chains(slots: &mut [Slot]) -> Result<Vec<Chain, MAX_PLAN_LEN>, PlanError> {
    let mut chains: Vec<Chain, MAX_PLAN_LEN> = Vec::new();
    let mut index = 0;

    while index < slots.len() {
        let Some(mut side) = slots[index].quarter_side() else {
            index += 1;
            continue;
        };

        let first = index;
        let mut last = index;
        while let Some(next) = slots.get(last + 1).and_then(Slot::quarter_side) {
            if next == side {
                break;
            }
            side = next;
            last += 1;
        }

        if last > first {
            for slot in &mut slots[first..=last] {
                slot.in_chain = true;
            }
            chains
                .push(Chain {
                    first,
                    last,
                    entry: Entry::Turn45,
                    exit: Exit::Turn45 { forward_follows: false },
                })
                .map_err(|_| PlanError::Overflow)?;
        }
        index = last + 1;
    }

    Ok(chains)
}

fn is_forward(slot: Option<&Slot>) -> bool {
    matches!(slot, Some(Slot { token: Token::Plain((Movement::Forward, _)), .. }))
}

/// Decides entry and exit of every chain in order. A free quarter between two chains goes
/// to the earlier chain's exit.
fn resolve_chains(slots: &mut [Slot], chains: &mut [Chain]) {
    for index in 0..chains.len() {
        let chain = chains[index];
        let entry_side = slots[chain.first].quarter_side();
        let exit_side = slots[chain.last].quarter_side();

        let entry = match chain.first.checked_sub(1) {
            Some(prev) if slots[prev].in_chain => Entry::AfterChain,
            Some(prev) if is_forward(slots.get(prev)) => Entry::AfterForward,
            Some(prev) if slots[prev].free_quarter().is_some() && slots[prev].free_quarter() == entry_side => {
                slots[prev].consumed = true;
                Entry::Turn135
            }
            _ => Entry::Turn45,
        };

        let next = chain.last + 1;
        let next_slot = slots.get(next).copied();
        let exit = match next_slot {
            Some(slot) if slot.in_chain => Exit::IntoChain,
            Some(slot) if slot.free_quarter().is_some() && slot.free_quarter() == exit_side => {
                slots[next].consumed = true;
                Exit::Turn135 {
                    forward_follows: is_forward(slots.get(next + 1)),
                }
            }
            slot => Exit::Turn45 {
                forward_follows: is_forward(slot.as_ref()),
            },
        };

        chains[index].entry = entry;
        chains[index].exit = exit;
    }
}

fn emit_chain(out: &mut MovementPlan, slots: &[Slot], chain: &Chain) -> Result<(), PlanError> {
    let entry_side = slots[chain.first].quarter_side().unwrap_or(Side::Left);
    let exit_side = slots[chain.last].quarter_side().unwrap_or(Side::Left);

    match chain.entry {
        Entry::AfterForward => {
            if let Some((Movement::Forward, count)) = out.pop() {
                if count > 1 {
                    push_step(out, (Movement::Forward, count - 1))?;
                }
            }
            push_step(out, (Movement::ForwardBeforeTurn45, 1))?;
            push_step(out, (Movement::turn_45(entry_side), 1))?;
        }
        Entry::Turn135 => push_step(out, (Movement::turn_135(entry_side), 1))?,
        Entry::AfterChain => {}
        Entry::Turn45 => push_step(out, (Movement::turn_45(entry_side), 1))?,
    }

    let diagonals = chain.last - chain.first;
    let mut remaining = diagonals;
    while remaining > 0 {
        let count = remaining.min(usize::from(u8::MAX));
        push_step(out, (Movement::Diagonal, count as u8))?;
        remaining -= count;
    }

    match chain.exit {
        Exit::IntoChain => push_step(out, (Movement::turn_90_from_45(exit_side), 1))?,
        Exit::Turn135 { forward_follows } => {
            push_step(out, (Movement::turn_135_from_45(exit_side), 1))?;
            if forward_follows {
                push_step(out, (Movement::ForwardAfterDiagonal, 1))?;
            }
        }
        Exit::Turn45 { forward_follows } => {
            push_step(out, (Movement::turn_45_from_45(exit_side), 1))?;
            if forward_follows {
                push_step(out, (Movement::ForwardAfterDiagonal, 1))?;
            }
        }
    }

    Ok(())
}

/// Replaces zig-zag turn sequences of a smoothed plan with diagonal runs.
pub fn convert_diagonals(plan: &[PlanStep]) -> Result<MovementPlan, PlanError> {
    let mut slots = expand(plan)?;
    let mut chains = find_chains(&mut slots)?;
    resolve_chains(&mut slots, &mut chains);

    let mut out = MovementPlan::new();
    let mut chains = chains.iter().peekable();
    let mut index = 0;

    while index < slots.len() {
        if let Some(chain) = chains.next_if(|chain| chain.first == index) {
            emit_chain(&mut out, &slots, chain)?;
            index = chain.last + 1;
            continue;
        }

        let slot = slots[index];
        index += 1;
        if slot.consumed {
            continue;
        }

        match slot.token {
            Token::Plain(step) => push_step(&mut out, step)?,
            Token::Quarter { side, half } => {
                // Both halves of a 180 left untouched are put back together.
                let pair = half == Half::First
                    && slots.get(index).is_some_and(|next| {
                        next.free_quarter() == Some(side)
                            && matches!(next.token, Token::Quarter { half: Half::Second, .. })
                    });
                if pair {
                    push_step(&mut out, (Movement::turn_180(side), 1))?;
                    index += 1;
                } else {
                    push_step(&mut out, (Movement::turn_90(side), 1))?;
                }
            }
        }
    }

    Ok(out)
}
