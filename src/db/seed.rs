// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sample routes returned when no catalog snapshot exists yet.

use crate::models::route::{Capacity, Creator, Difficulty, Participant, Route};
use crate::models::identity::DEFAULT_AVATAR;

fn rider(name: &str, bike: &str) -> Participant {
    Participant {
        user_id: None,
        name: name.to_string(),
        avatar: DEFAULT_AVATAR.to_string(),
        bike: bike.to_string(),
        has_passenger: false,
        passenger_name: None,
    }
}

fn creator(name: &str, rating: f64, rides_led: u32) -> Creator {
    Creator {
        name: name.to_string(),
        avatar: DEFAULT_AVATAR.to_string(),
        rating,
        rides_led,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The three demo routes.
pub fn seed_routes() -> Vec<Route> {
    let mut routes = vec![
        Route {
            id: 1,
            title: "Pacific Coast Highway Adventure".to_string(),
            description: "Scenic coastal ride through California's most beautiful landscapes"
                .to_string(),
            difficulty: Difficulty::Intermediate,
            distance: "450 miles".to_string(),
            duration: "2 days".to_string(),
            start_location: "San Francisco, CA".to_string(),
            end_location: "Los Angeles, CA".to_string(),
            date: "2024-01-15".to_string(),
            time: "08:00 AM".to_string(),
            max_participants: Capacity::bounded(12).unwrap_or(Capacity::Unbounded),
            current_participants: 0,
            rating: 4.8,
            creator: creator("Mike Rodriguez", 4.9, 23),
            meeting_point: "Golden Gate Bridge Parking Area".to_string(),
            highlights: strings(&["Big Sur coastline", "Hearst Castle", "Malibu beaches"]),
            requirements: strings(&[
                "Valid motorcycle license",
                "Highway riding experience",
                "Full tank of gas",
            ]),
            participants: vec![
                rider("Sarah Johnson", "Harley Davidson"),
                rider("Tom Wilson", "BMW R1250GS"),
                rider("Lisa Chen", "Yamaha MT-07"),
                rider("David Brown", "Honda CB650R"),
                rider("Emma Davis", "Kawasaki Ninja"),
                rider("Alex Miller", "Ducati Monster"),
                rider("Rachel Green", "Triumph Street Triple"),
                rider("Chris Taylor", "Suzuki GSX-R"),
            ],
            map_image: "/placeholder.svg?height=200&width=400&text=Route+Map".to_string(),
        },
        Route {
            id: 2,
            title: "Mountain Pass Challenge".to_string(),
            description: "Thrilling ride through winding mountain roads".to_string(),
            difficulty: Difficulty::Advanced,
            distance: "280 miles".to_string(),
            duration: "1 day".to_string(),
            start_location: "Denver, CO".to_string(),
            end_location: "Aspen, CO".to_string(),
            date: "2024-01-20".to_string(),
            time: "07:00 AM".to_string(),
            max_participants: Capacity::bounded(8).unwrap_or(Capacity::Unbounded),
            current_participants: 0,
            rating: 4.9,
            creator: creator("Jessica Martinez", 4.8, 31),
            meeting_point: "REI Denver Flagship Store".to_string(),
            highlights: strings(&["Rocky Mountain views", "Independence Pass", "Alpine scenery"]),
            requirements: strings(&[
                "Advanced riding skills",
                "Mountain riding experience",
                "Cold weather gear",
            ]),
            participants: vec![
                rider("Mark Thompson", "BMW S1000RR"),
                rider("Jennifer Lee", "Aprilia RSV4"),
                rider("Robert Kim", "Yamaha R1"),
                rider("Amanda White", "Ducati Panigale"),
                rider("Steve Garcia", "Honda CBR1000RR"),
                rider("Nicole Adams", "Kawasaki ZX-10R"),
            ],
            map_image: "/placeholder.svg?height=200&width=400&text=Mountain+Route".to_string(),
        },
        Route {
            id: 3,
            title: "Desert Sunset Cruise".to_string(),
            description: "Relaxing evening ride through desert landscapes".to_string(),
            difficulty: Difficulty::Beginner,
            distance: "120 miles".to_string(),
            duration: "4 hours".to_string(),
            start_location: "Phoenix, AZ".to_string(),
            end_location: "Sedona, AZ".to_string(),
            date: "2024-01-25".to_string(),
            time: "03:00 PM".to_string(),
            max_participants: Capacity::bounded(15).unwrap_or(Capacity::Unbounded),
            current_participants: 0,
            rating: 4.6,
            creator: creator("Carlos Mendez", 4.7, 18),
            meeting_point: "Harley-Davidson of Scottsdale".to_string(),
            highlights: strings(&["Red rock formations", "Desert sunset", "Scenic overlooks"]),
            requirements: strings(&["Basic riding skills", "Sun protection", "Water bottle"]),
            participants: vec![
                rider("Maria Gonzalez", "Indian Scout"),
                rider("John Anderson", "Harley Street Glide"),
                rider("Patricia Moore", "Honda Rebel"),
                rider("Kevin Clark", "Yamaha Bolt"),
                rider("Linda Rodriguez", "Kawasaki Vulcan"),
                rider("Michael Lewis", "Suzuki Boulevard"),
                rider("Sandra Walker", "Victory Octane"),
                rider("Daniel Hall", "BMW R18"),
                rider("Karen Young", "Triumph Bonneville"),
                rider("Paul Allen", "Moto Guzzi V7"),
                rider("Nancy King", "Royal Enfield"),
                rider("Gary Wright", "Harley Iron 883"),
            ],
            map_image: "/placeholder.svg?height=200&width=400&text=Desert+Route".to_string(),
        },
    ];

    for route in &mut routes {
        route.sync_participant_count();
    }
    routes
}
