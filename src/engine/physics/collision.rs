use rapier3d::prelude::*;

/// Collision object types, used both for collision filtering and for
/// picking what a query may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Characters (player and AI)
    Pawn = 0b0000_0010,

    /// Floors, walls and other immovable geometry
    WorldStatic = 0b0000_0100,

    /// Movable props (crates, barrels)
    WorldDynamic = 0b0000_1000,

    /// Trigger volumes - don't cause physical collision
    Sensor = 0b0001_0000,
}

impl CollisionGroups {
    /// The membership bit of this group
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Union of several groups, for object-type queries
    pub fn union(groups: &[CollisionGroups]) -> Group {
        groups
            .iter()
            .fold(Group::empty(), |acc, group| acc | group.group())
    }

    /// Convert to rapier3d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            // Pawns block each other as well as the world
            CollisionGroups::Pawn => Self::union(&[
                CollisionGroups::Pawn,
                CollisionGroups::WorldStatic,
                CollisionGroups::WorldDynamic,
                CollisionGroups::Sensor,
                CollisionGroups::Default,
            ]),

            // Static geometry never needs to test against itself
            CollisionGroups::WorldStatic => Self::union(&[
                CollisionGroups::Pawn,
                CollisionGroups::WorldDynamic,
                CollisionGroups::Default,
            ]),

            CollisionGroups::WorldDynamic => Self::union(&[
                CollisionGroups::Pawn,
                CollisionGroups::WorldStatic,
                CollisionGroups::WorldDynamic,
                CollisionGroups::Default,
            ]),

            CollisionGroups::Sensor => Self::union(&[CollisionGroups::Pawn]),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(self.group(), filter)
    }
}
