// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Motorcycles offered in the join dialog.

/// Choice that lets the rider type a custom model.
pub const OTHER_BIKE: &str = "Other";

/// Popular models, in display order, ending with [`OTHER_BIKE`].
pub const POPULAR_BIKES: &[&str] = &[
    "Harley Davidson",
    "BMW R1250GS",
    "Yamaha MT-07",
    "Honda CB650R",
    "Kawasaki Ninja",
    "Ducati Monster",
    "Triumph Street Triple",
    "Suzuki GSX-R",
    "Indian Scout",
    "Aprilia RSV4",
    "Yamaha R1",
    "Ducati Panigale",
    "Honda CBR1000RR",
    "Kawasaki ZX-10R",
    "BMW S1000RR",
    "Honda Rebel",
    "Yamaha Bolt",
    "Kawasaki Vulcan",
    "Suzuki Boulevard",
    "Victory Octane",
    "BMW R18",
    "Triumph Bonneville",
    "Moto Guzzi V7",
    "Royal Enfield",
    "Harley Iron 883",
    OTHER_BIKE,
];
