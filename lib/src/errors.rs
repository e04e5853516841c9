use soroban_sdk::contracterror;

/// Failure taxonomy shared by every rental operation.
///
/// Returning any of these from a contract function aborts the invocation
/// and rolls back all of its state changes.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    /// Caller lacks the privilege the operation requires.
    Unauthorized = 1,
    /// The vehicle id was never registered.
    UnknownVehicle = 2,
    /// The rental is not in the state the transition starts from.
    InvalidState = 3,
    /// Attached value or deposit below what the rental requires.
    InsufficientDeposit = 4,
    /// Disbursement larger than the escrowed balance.
    InsufficientEscrow = 5,
    /// Vehicle is out of service or already rented.
    VehicleUnavailable = 6,
    /// Caller is not the renter of the active rental.
    NotRenter = 7,
    /// The token contract rejected a transfer.
    TransferFailed = 8,
    /// Daily rate must be strictly positive.
    InvalidRate = 9,
    /// Malformed argument, such as empty metadata or an oversized page.
    InvalidInput = 10,
    /// The rental id was never issued.
    UnknownRental = 11,
    /// Missing contract setup or an out-of-range config value.
    InvalidConfig = 12,
    /// A counter or balance would overflow.
    ArithmeticOverflow = 13,
}
