//! Traffic sign model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SignError;

macro_rules! sign_types {
    ($($variant:ident),+ $(,)?) => {
        /// Sign classes reported by the classifier
        ///
        /// Declaration order matters: the speed-limit family comes first and
        /// ends at `SpeedLimitRamp`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SignType {
            $($variant),+
        }

        impl SignType {
            /// Every sign class in declaration order
            pub const ALL: &'static [SignType] = &[$(SignType::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(SignType::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for SignType {
            type Err = SignError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(SignType::$variant),)+
                    _ => Err(SignError::IllegalSign(s.to_string())),
                }
            }
        }
    };
}

sign_types! {
    Unknown,
    SpeedLimit,
    SpeedLimitEnd,
    SpeedLimitMin,
    SpeedLimitNight,
    SpeedLimitTrucks,
    Mass,
    SpeedLimitComplementary,
    SpeedLimitExit,
    SpeedLimitRamp,
    WarningTurnLeft,
    WarningTurnRight,
    WarningHairpinCurveLeft,
    WarningRoundabout,
    WarningSpeedBump,
    WarningWindingRoad,
    InformationBikeRoute,
    InformationParking,
    RegulatoryAllDirectionsPermitted,
    RegulatoryBicyclesOnly,
    RegulatoryDoNotPass,
    RegulatoryDoNotDriveOnShoulder,
    RegulatoryDualLanesAllDirectionsOnRight,
    RegulatoryDualLanesGoLeftOrRight,
    RegulatoryDualLanesGoStraightOnLeft,
    RegulatoryDualLanesGoStraightOnRight,
    RegulatoryDualLanesTurnLeft,
    RegulatoryDualLanesTurnLeftOrStraight,
    RegulatoryDualLanesTurnRightOrStraight,
    RegulatoryEndOfSchoolZone,
    RegulatoryGoStraight,
    RegulatoryGoStraightOrTurnLeft,
    RegulatoryGoStraightOrTurnRight,
    RegulatoryHeightLimit,
    RegulatoryLeftTurnYieldOnGreen,
    RegulatoryNoBicycles,
    RegulatoryNoEntry,
    RegulatoryNoLeftOrUTurn,
    RegulatoryNoLeftTurn,
    RegulatoryNoMotorVehicles,
    RegulatoryNoParking,
    RegulatoryNoParkingOrNoStopping,
    RegulatoryNoPedestrians,
    RegulatoryNoRightTurn,
    RegulatoryNoStopping,
    RegulatoryNoStraightThrough,
    RegulatoryNoUTurn,
    RegulatoryOneWayStraight,
    RegulatoryReversibleLanes,
    RegulatoryRoadClosedToVehicles,
    RegulatoryStop,
    RegulatoryTrafficSignalPhotoEnforced,
    RegulatoryTripleLanesGoStraightCenterLane,
    WarningBicyclesCrossing,
    WarningHeightRestriction,
    WarningPassLeftOrRight,
    WarningPedestriansCrossing,
    WarningRoadNarrowsLeft,
    WarningRoadNarrowsRight,
    WarningSchoolZone,
    WarningStopAhead,
    WarningTrafficSignals,
    WarningTwoWayTraffic,
    WarningYieldAhead,
    InformationHighway,
    RegulatoryDoNotBlockIntersection,
    RegulatoryKeepRightPicture,
    RegulatoryKeepRightText,
    RegulatoryNoHeavyGoodsVehiclesPicture,
    RegulatoryNoLeftTurnText,
    RegulatoryOneWayLeftArrow,
    RegulatoryOneWayLeftArrowText,
    RegulatoryOneWayLeftText,
    RegulatoryOneWayRightArrow,
    RegulatoryOneWayRightArrowText,
    RegulatoryOneWayRightText,
    RegulatoryTurnLeftAhead,
    RegulatoryTurnLeft,
    RegulatoryTurnLeftOrRight,
    RegulatoryTurnRightAhead,
    RegulatoryYield,
    WarningRailwayCrossing,
    WarningHairpinCurveRight,
    ComplementaryOneDirectionLeft,
    ComplementaryOneDirectionRight,
    WarningCurveLeft,
    WarningCurveRight,
    WarningHorizontalAlignmentLeft,
    WarningHorizontalAlignmentRight,
    RegulatoryTurnRight,
    WhiteTablesText,
    Lanes,
    GreenPlates,
    WarningText,
    WarningCrossroads,
    WarningPicture,
    ComplementaryKeepLeft,
    ComplementaryKeepRight,
    RegulatoryExceptBicycle,
    WarningAddedLaneRight,
    WarningDeadEndText,
    WarningDipText,
    WarningEmergencyVehicles,
    WarningEndText,
    WarningFallingRocksOrDebrisRight,
    WarningLowGroundClearance,
    WarningObstructionMarker,
    WarningPlayground,
    WarningSecondRoadRight,
    WarningTurnLeftOnlyArrow,
    WarningTurnLeftOrRightOnlyArrow,
    WarningTramsCrossing,
    WarningUnevenRoad,
    WarningWildAnimals,
    RegulatoryParkingRestrictions,
    RegulatoryYieldOrStopForPedestrians,
    RegulatoryNoBuses,
    RegulatoryNoSmallPassengerCar,
    RegulatoryNoMotorcyclesOrMopeds,
    RegulatoryNoTurnLeftOrTurnRight,
    RegulatoryNoOvertaking,
    RegulatoryNoHonking,
    RegulatoryWidthLimit,
    RegulatoryAxleWeightLimit,
    RegulatoryNoVehiclesCarryingExplosives,
    RegulatoryRoundabout,
    RegulatoryHonking,
    RegulatoryPedestriansCrossing,
    RegulatoryMotorVehicles,
    RegulatoryUTurn,
    WarningSteepAscent,
    WarningSteepDescent,
    WarningVillage,
    WarningKeepSlowdown,
    WarningDangerousTraffic,
    WarningRoadworks,
    WarningSecondRoadLeft,
    RegulatoryNoTurnOnRedText,
    WarningAddedLaneLeft,
    WarningFlaggersInRoad,
    WarningLoop270Degree,
    WarningRoadNarrows,
    WarningSlipperyRoadSurface,
    RegulatoryBusLane,
    RegulatoryEndNoOvertaking,
    RegulatoryNoHumanCargoTricycleEntry,
    RegulatoryNoHumanPassengerTricycleEntry,
    RegulatoryNoRickshaws,
    RegulatoryNoStraightThroughOrTurnLeft,
    RegulatoryNoStraightThroughOrTurnRight,
    RegulatoryNoTractors,
    RegulatoryNoTricycles,
    RegulatoryUTurnOrTurnLeft,
    RegulatoryWalk,
    WarningDangerousMountainRoadLeft,
    WarningDangerousMountainRoadRight,
    WarningDomesticAnimals,
    WarningFallingRocksOrDebrisLeft,
    WarningHazardLane,
    WarningRailroadCrossingWithoutBarriers,
    WarningReverseCurveLeft,
    WarningReverseCurveRight,
    WarningSoftShoulderLeft,
    WarningSoftShoulderRight,
    WarningTunnel,
    WarningWaterPavement,
    SpeedLimitAdvMax,
    SpeedLimitEndAdv,
    RegulatoryEndLimitedAccessRoad,
    RegulatoryEndMotorway,
    RegulatoryEquestriansOnly,
    RegulatoryGasStation,
    InformationHospital,
    InformationLivingStreet,
    RegulatoryMotorway,
    RegulatorySharedLaneBicyclesPedestrians,
    RegulatoryEndPriorityRoad,
    RegulatoryEndProhibition,
    RegulatoryGiveWayToOncomingTraffic,
    RegulatoryMinSafeDist,
    RegulatoryNoDangerGoods,
    RegulatoryNoOverHeavy,
    RegulatoryPriorityOverOncomingTraffic,
    RegulatoryPriorityRoad,
    RegulatoryWeightLimit,
    WarningDangerousCrosswinds,
    WarningIcyRoad,
    WarningLowFlyingAircraft,
    WarningOpeningOrSwingBridge,
    WarningRailwayCrossingWithBarriers,
    WarningTrafficQueues,
}

impl SignType {
    /// Whether the classifier's number is meaningful for this sign class
    pub fn carries_number(&self) -> bool {
        (*self as usize) <= (SignType::SpeedLimitRamp as usize)
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speed-limit value shown on a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignNumber {
    Limit5,
    Limit15,
    Limit25,
    Limit35,
    Limit45,
    Limit55,
    Limit65,
    Limit75,
    Limit85,
    Limit10,
    Limit20,
    Limit30,
    Limit40,
    Limit50,
    Limit60,
    Limit70,
    Limit80,
    Limit90,
    Limit100,
    Limit110,
    Limit120,
    Unknown,
}

impl SignNumber {
    const KNOWN: [SignNumber; 21] = [
        SignNumber::Limit5,
        SignNumber::Limit15,
        SignNumber::Limit25,
        SignNumber::Limit35,
        SignNumber::Limit45,
        SignNumber::Limit55,
        SignNumber::Limit65,
        SignNumber::Limit75,
        SignNumber::Limit85,
        SignNumber::Limit10,
        SignNumber::Limit20,
        SignNumber::Limit30,
        SignNumber::Limit40,
        SignNumber::Limit50,
        SignNumber::Limit60,
        SignNumber::Limit70,
        SignNumber::Limit80,
        SignNumber::Limit90,
        SignNumber::Limit100,
        SignNumber::Limit110,
        SignNumber::Limit120,
    ];

    /// Numeric value, 0 for `Unknown`
    pub fn value(&self) -> u32 {
        match self {
            SignNumber::Limit5 => 5,
            SignNumber::Limit15 => 15,
            SignNumber::Limit25 => 25,
            SignNumber::Limit35 => 35,
            SignNumber::Limit45 => 45,
            SignNumber::Limit55 => 55,
            SignNumber::Limit65 => 65,
            SignNumber::Limit75 => 75,
            SignNumber::Limit85 => 85,
            SignNumber::Limit10 => 10,
            SignNumber::Limit20 => 20,
            SignNumber::Limit30 => 30,
            SignNumber::Limit40 => 40,
            SignNumber::Limit50 => 50,
            SignNumber::Limit60 => 60,
            SignNumber::Limit70 => 70,
            SignNumber::Limit80 => 80,
            SignNumber::Limit90 => 90,
            SignNumber::Limit100 => 100,
            SignNumber::Limit110 => 110,
            SignNumber::Limit120 => 120,
            SignNumber::Unknown => 0,
        }
    }

    /// Match a classifier number (fraction truncated) to a known limit
    pub fn from_number(number: f32) -> Self {
        let value = number as i64;
        Self::KNOWN
            .iter()
            .copied()
            .find(|known| i64::from(known.value()) == value)
            .unwrap_or(SignNumber::Unknown)
    }
}

/// Sign as displayed in the sign row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UiSign {
    pub sign_type: SignType,
    pub sign_number: SignNumber,
}

impl UiSign {
    pub fn new(sign_type: SignType, sign_number: SignNumber) -> Self {
        Self {
            sign_type,
            sign_number,
        }
    }

    /// Convert a single classifier result
    pub fn from_classification(classification: &SignClassification) -> Result<Self, SignError> {
        let sign_type: SignType = classification.sign_type.parse()?;

        let sign_number = if sign_type.carries_number() {
            SignNumber::from_number(classification.number)
        } else {
            SignNumber::Unknown
        };

        Ok(Self::new(sign_type, sign_number))
    }

    /// Convert every classification of a frame; one illegal sign fails the frame
    pub fn from_frame(frame: &FrameSignClassifications) -> Result<Vec<Self>, SignError> {
        frame.signs.iter().map(Self::from_classification).collect()
    }
}

impl fmt::Display for UiSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign_number {
            SignNumber::Unknown => write!(f, "{}", self.sign_type),
            number => write!(f, "{} {}", self.sign_type, number.value()),
        }
    }
}

/// Raw classifier output for one sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignClassification {
    /// Sign class name
    pub sign_type: String,

    /// Value read from the sign face, if any
    #[serde(default)]
    pub number: f32,
}

/// All sign classifications of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSignClassifications {
    #[serde(default)]
    pub signs: Vec<SignClassification>,
}
