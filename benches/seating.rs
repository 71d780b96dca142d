use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cinema_admin::models::{Movie, Reservation};
use cinema_admin::services::{seat_map::generate_seat_map, stats::aggregate};

fn bench_seat_map(c: &mut Criterion) {
    c.bench_function("generate_seat_map 500", |b| {
        b.iter(|| generate_seat_map(black_box(500)))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let movies: Vec<Movie> = (1..=20)
        .map(|id| Movie {
            id,
            title: format!("Movie {id}"),
            gender: "drama".into(),
            duration: 120,
            classification: "PG".into(),
        })
        .collect();

    let reservations: Vec<Reservation> = (1..=2_000)
        .map(|id| Reservation {
            id,
            customer_name: format!("Customer {id}"),
            doc_number: format!("DOC-{}", id % 300),
            email: format!("c{id}@example.com"),
            movie_id: id % 20 + 1,
            room_id: 1,
            show_time: "2025-03-01T18:30".into(),
            seats: vec![format!("{}-1", id % 10 + 1), format!("{}-2", id % 10 + 1)],
            movie_title: String::new(),
            room_name: String::new(),
        })
        .collect();

    c.bench_function("aggregate 20 movies x 2000 reservations", |b| {
        b.iter(|| aggregate(black_box(&movies), black_box(&reservations)))
    });
}

criterion_group!(benches, bench_seat_map, bench_aggregate);
criterion_main!(benches);
