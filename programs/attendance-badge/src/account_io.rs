//! Manual load/store for program accounts whose size follows their content
//! (indexes, badge lists, rosters) and for accounts created per batch entry.

use anchor_lang::{
    prelude::*,
    system_program::{allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer},
};

use crate::{
    constants::{CATEGORY_INDEX_SEED, EVENT_BADGES_SEED, MAX_CATEGORY_LEN, USER_STATS_SEED},
    error::AttendanceError,
    state::{EventBadges, UserStats},
};

/// Check that `info` sits at the PDA derived from `seeds`; returns the bump.
pub fn expect_pda(info: &AccountInfo, seeds: &[&[u8]], program_id: &Pubkey) -> Result<u8> {
    let (expected, bump) = Pubkey::find_program_address(seeds, program_id);
    require_keys_eq!(expected, info.key(), AttendanceError::InvalidAccount);
    Ok(bump)
}

pub fn exists(info: &AccountInfo) -> bool {
    !info.data_is_empty()
}

/// Deserialize a program-owned account of type `T`.
pub fn read_account<T: AccountDeserialize>(info: &AccountInfo, program_id: &Pubkey) -> Result<T> {
    require_keys_eq!(*info.owner, *program_id, AttendanceError::InvalidAccount);
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Deserialize `T`, or start from `T::default()` when the account has not
/// been created yet.
pub fn open_account<T: AccountDeserialize + Default>(info: &AccountInfo, program_id: &Pubkey) -> Result<T> {
    if exists(info) {
        read_account(info, program_id)
    } else {
        Ok(T::default())
    }
}

/// How a PDA is brought to the size a write needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provision {
    /// Untouched address: `create_account`
    Create { space: usize },
    /// Address already holds lamports but no data (anyone can fund a PDA):
    /// top up rent, then `allocate` and `assign` under the PDA seeds
    Adopt { space: usize, top_up: u64 },
    /// Program-owned and too small: top up rent, then resize
    Grow { len: usize, top_up: u64 },
    /// Encoding fits the current allocation
    InPlace,
}

pub fn plan_provision(rent: &Rent, lamports: u64, data_len: usize, encoded_len: usize, min_space: usize) -> Provision {
    if data_len == 0 {
        let space = encoded_len.max(min_space);
        if lamports == 0 {
            Provision::Create { space }
        } else {
            Provision::Adopt {
                space,
                top_up: rent.minimum_balance(space).saturating_sub(lamports),
            }
        }
    } else if data_len < encoded_len {
        Provision::Grow {
            len: encoded_len,
            top_up: rent.minimum_balance(encoded_len).saturating_sub(lamports),
        }
    } else {
        Provision::InPlace
    }
}

/// Copy `encoded` to the front of `data` and zero the tail left by a
/// longer previous encoding.
pub fn store(data: &mut [u8], encoded: &[u8]) -> Result<()> {
    require!(data.len() >= encoded.len(), AttendanceError::InvalidAccount);
    let (head, tail) = data.split_at_mut(encoded.len());
    head.copy_from_slice(encoded);
    tail.fill(0);
    Ok(())
}

/// Address of a category index. Categories longer than a seed have no index.
pub fn category_index_address(category: &str, program_id: &Pubkey) -> Option<(Pubkey, u8)> {
    (category.len() <= MAX_CATEGORY_LEN)
        .then(|| Pubkey::find_program_address(&[CATEGORY_INDEX_SEED, category.as_bytes()], program_id))
}

/// Payer and programs needed to create or grow PDAs
pub struct AccountWriter<'a, 'info> {
    pub payer: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub program_id: &'a Pubkey,
}

impl<'a, 'info> AccountWriter<'a, 'info> {
    pub fn new(payer: &'a AccountInfo<'info>, system_program: &'a AccountInfo<'info>, program_id: &'a Pubkey) -> Self {
        Self {
            payer,
            system_program,
            program_id,
        }
    }

    /// Serialize `value` into the PDA at `info`, creating the account on
    /// first write (at least `min_space` bytes) and growing it, rent topped
    /// up by the payer, when the encoding no longer fits.
    pub fn write<T: AccountSerialize>(
        &self,
        value: &T,
        info: &AccountInfo<'info>,
        seeds: &[&[u8]],
        bump: u8,
        min_space: usize,
    ) -> Result<()> {
        let mut encoded = Vec::new();
        value.try_serialize(&mut encoded)?;

        if exists(info) {
            require_keys_eq!(*info.owner, *self.program_id, AttendanceError::InvalidAccount);
        }

        let rent = Rent::get()?;
        match plan_provision(&rent, info.lamports(), info.data_len(), encoded.len(), min_space) {
            Provision::Create { space } => self.create(info, seeds, bump, rent.minimum_balance(space), space)?,
            Provision::Adopt { space, top_up } => self.adopt(info, seeds, bump, top_up, space)?,
            Provision::Grow { len, top_up } => {
                self.fund(info, top_up)?;
                info.resize(len)?;
            }
            Provision::InPlace => {}
        }

        let mut data = info.try_borrow_mut_data()?;
        store(&mut data, &encoded)
    }

    fn create(&self, info: &AccountInfo<'info>, seeds: &[&[u8]], bump: u8, lamports: u64, space: usize) -> Result<()> {
        let bump_seed = [bump];
        let mut signer_seeds: Vec<&[u8]> = seeds.to_vec();
        signer_seeds.push(&bump_seed);

        create_account(
            CpiContext::new_with_signer(
                self.system_program.clone(),
                CreateAccount {
                    from: self.payer.clone(),
                    to: info.clone(),
                },
                &[signer_seeds.as_slice()],
            ),
            lamports,
            space as u64,
            self.program_id,
        )
    }

    fn adopt(&self, info: &AccountInfo<'info>, seeds: &[&[u8]], bump: u8, top_up: u64, space: usize) -> Result<()> {
        let bump_seed = [bump];
        let mut signer_seeds: Vec<&[u8]> = seeds.to_vec();
        signer_seeds.push(&bump_seed);
        let signer = [signer_seeds.as_slice()];

        self.fund(info, top_up)?;
        allocate(
            CpiContext::new_with_signer(
                self.system_program.clone(),
                Allocate {
                    account_to_allocate: info.clone(),
                },
                &signer,
            ),
            space as u64,
        )?;
        assign(
            CpiContext::new_with_signer(
                self.system_program.clone(),
                Assign {
                    account_to_assign: info.clone(),
                },
                &signer,
            ),
            self.program_id,
        )
    }

    fn fund(&self, info: &AccountInfo<'info>, lamports: u64) -> Result<()> {
        if lamports == 0 {
            return Ok(());
        }
        transfer(
            CpiContext::new(
                self.system_program.clone(),
                Transfer {
                    from: self.payer.clone(),
                    to: info.clone(),
                },
            ),
            lamports,
        )
    }
}

// ============================================================================
// BADGE LEDGER LISTS
// ============================================================================

pub fn open_user_stats(info: &AccountInfo, user: Pubkey, bump: u8, program_id: &Pubkey) -> Result<UserStats> {
    let mut stats: UserStats = open_account(info, program_id)?;
    stats.user = user;
    stats.bump = bump;
    Ok(stats)
}

pub fn save_user_stats<'info>(writer: &AccountWriter<'_, 'info>, info: &AccountInfo<'info>, stats: &UserStats) -> Result<()> {
    writer.write(
        stats,
        info,
        &[USER_STATS_SEED, stats.user.as_ref()],
        stats.bump,
        0,
    )
}

pub fn open_event_badges(info: &AccountInfo, event_id: u64, bump: u8, program_id: &Pubkey) -> Result<EventBadges> {
    let mut roster: EventBadges = open_account(info, program_id)?;
    roster.event_id = event_id;
    roster.bump = bump;
    Ok(roster)
}

pub fn save_event_badges<'info>(
    writer: &AccountWriter<'_, 'info>,
    info: &AccountInfo<'info>,
    roster: &EventBadges,
) -> Result<()> {
    writer.write(
        roster,
        info,
        &[EVENT_BADGES_SEED, roster.event_id.to_le_bytes().as_ref()],
        roster.bump,
        0,
    )
}
