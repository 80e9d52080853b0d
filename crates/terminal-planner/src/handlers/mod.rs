//! One investment handler per asset family, dispatched in a fixed order.
//!
//! Later handlers read the registry left by earlier ones: horizontal
//! transport and general services are sized on the cranes the quay handler
//! just bought, stack equipment on the stacks.

mod barge;
mod landside;
mod quay;
mod yard;

use crate::planner::{until_satisfied, Order, YearContext};
use terminal_core::{AssetId, AssetKind, AssetParams, AssetRegistry, BargeSide, PlanError};

/// Investment functions in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Investment {
    Quay,
    HorizontalTransport,
    LadenStack,
    EmptyStack,
    OogStack,
    StackEquipment,
    Gate,
    BargeBerth,
    EmptyHandler,
    GeneralServices,
    Barge,
    BargeChannel,
}

impl Investment {
    pub const ORDER: [Investment; 12] = [
        Investment::Quay,
        Investment::HorizontalTransport,
        Investment::LadenStack,
        Investment::EmptyStack,
        Investment::OogStack,
        Investment::StackEquipment,
        Investment::Gate,
        Investment::BargeBerth,
        Investment::EmptyHandler,
        Investment::GeneralServices,
        Investment::Barge,
        Investment::BargeChannel,
    ];

    /// Run this handler for the context's year.
    pub fn run(self, ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
        match self {
            Investment::Quay => quay::invest(ctx),
            Investment::HorizontalTransport => yard::horizontal_transport(ctx),
            Investment::LadenStack => yard::laden_stack(ctx),
            Investment::EmptyStack => yard::empty_stack(ctx),
            Investment::OogStack => yard::oog_stack(ctx),
            Investment::StackEquipment => yard::stack_equipment(ctx),
            Investment::Gate => landside::gate(ctx),
            Investment::BargeBerth => barge::barge_berths(ctx),
            Investment::EmptyHandler => landside::empty_handler(ctx),
            Investment::GeneralServices => landside::general_services(ctx),
            Investment::Barge => barge::barge_fleet(ctx),
            Investment::BargeChannel => barge::barge_channel(ctx),
        }
    }
}

/// First berth, in creation order, with a free crane slot.
///
/// Quay berths are matched with `side = None`, barge berths with their side.
pub(crate) fn free_slot(
    registry: &AssetRegistry,
    berth: AssetKind,
    crane: AssetKind,
    side: Option<BargeSide>,
) -> Option<AssetId> {
    registry
        .assets_of_kind(berth)
        .filter(|(_, b)| b.detail.barge_side() == side)
        .find(|(id, b)| {
            let used = registry
                .assets_of_kind(crane)
                .filter(|(_, c)| c.detail.crane_berth() == Some(*id))
                .count();
            used < b.detail.max_cranes().unwrap_or(0) as usize
        })
        .map(|(id, _)| id)
}

/// Count-sized equipment: add units until `installed >= required`.
pub(crate) fn top_up_units<R>(
    ctx: &mut YearContext<'_>,
    kind: AssetKind,
    params: &AssetParams,
    required: R,
) -> Result<(), PlanError>
where
    R: Fn(&YearContext<'_>) -> f64,
{
    until_satisfied(
        ctx,
        kind,
        |c| Ok(c.registry().count_planned(kind) as f64 >= required(c)),
        |c| c.commission(Order::unit(kind, params)).map(|_| ()),
    )
    .map(|_| ())
}
