pub mod forms;
pub mod movie;
pub mod reservation;
pub mod room;
pub mod seat;

pub use forms::{MovieForm, ReservationDetails, ReservationForm, RoomForm};
pub use movie::Movie;
pub use reservation::{decode_reservations, DecodeError, RawReservation, Reservation};
pub use room::{Room, SeatTier};
pub use seat::{SeatError, SeatId};
